//! Flowsynth
//!
//! An AI-driven workflow synthesis engine: natural-language automation
//! requests are matched against a template corpus, analyzed into a
//! structured requirement, compiled into a validated workflow graph and
//! created on an n8n-compatible orchestration platform. Every attempt is
//! audited, success or failure.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use api::state::AppState;
use domain::{AuditRepository, EmbeddingProvider, LlmProvider, PlatformAdapter, TemplateRepository};
use infrastructure::analyzer::IntentAnalyzer;
use infrastructure::embedding::OpenAiEmbeddingProvider;
use infrastructure::http_client::HttpClient;
use infrastructure::llm::OpenAiProvider;
use infrastructure::matcher::{TemplateMatcher, TemplateVectorCache};
use infrastructure::platform::N8nClient;
use infrastructure::services::SynthesisService;
use infrastructure::storage::{InMemoryAuditStore, PostgresAuditStore, PostgresConfig};
use infrastructure::templates::InMemoryTemplateRepository;

/// Timeout for one LLM completion call
const LLM_CLIENT_TIMEOUT: Duration = Duration::from_secs(90);

/// Timeout for one embedding call
const EMBEDDING_CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Create the application state with all collaborators wired up
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let llm: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::with_base_url(
        HttpClient::with_timeout(LLM_CLIENT_TIMEOUT)?,
        &config.llm.api_key,
        &config.llm.base_url,
    ));

    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(
        OpenAiEmbeddingProvider::with_base_url(
            HttpClient::with_timeout(EMBEDDING_CLIENT_TIMEOUT)?,
            config.embedding.effective_api_key(&config.llm),
            &config.embedding.base_url,
        )
        .with_model(&config.embedding.model, config.embedding.dimensions),
    );

    let templates: Arc<dyn TemplateRepository> = Arc::new(InMemoryTemplateRepository::new());
    let matcher = Arc::new(TemplateMatcher::new(embedder, TemplateVectorCache::new()));
    let cached = matcher.warm(&templates).await?;
    info!(templates = cached, "Template cache warmed");

    let platform: Arc<dyn PlatformAdapter> = Arc::new(N8nClient::new(
        Arc::new(HttpClient::with_timeout(Duration::from_secs(
            config.platform.timeout_secs,
        ))?),
        &config.platform.base_url,
        &config.platform.api_key,
    ));

    let audit: Arc<dyn AuditRepository> = match config.storage.backend.as_str() {
        "postgres" => {
            let store = PostgresAuditStore::connect(
                &PostgresConfig::new(&config.storage.database_url)
                    .with_max_connections(config.storage.max_connections),
            )
            .await?;
            info!("Using PostgreSQL audit storage");
            Arc::new(store)
        }
        _ => {
            info!("Using in-memory audit storage");
            Arc::new(InMemoryAuditStore::new())
        }
    };

    let analyzer = IntentAnalyzer::new(llm, &config.llm.model);
    let service = SynthesisService::new(matcher, analyzer, platform, audit);

    Ok(AppState::new(Arc::new(service)))
}
