//! The synthesis pipeline service
//!
//! Single entry point for turning an automation request into a platform
//! workflow: record the request, match templates, analyze intent, build
//! the graph, create the workflow, persist the outcome. Every request
//! ends with exactly one audit outcome, success or failure.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::time::timeout;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    AuditRepository, AutomationOutcome, AutomationRequest, DomainError, GraphSummary,
    PlatformAdapter, Requirement, StoredStats, WorkflowGraph, WorkflowRecord,
};
use crate::infrastructure::analyzer::IntentAnalyzer;
use crate::infrastructure::builder::GraphBuilder;
use crate::infrastructure::matcher::TemplateMatcher;

/// Templates offered to the analyzer as grounding context
const MAX_TEMPLATE_MATCHES: usize = 5;

const MAX_WORKFLOW_NAME_LEN: usize = 60;

/// Per-stage timeouts for the pipeline's slow collaborators
#[derive(Debug, Clone, Copy)]
pub struct SynthesisTimeouts {
    /// Template matching, dominated by one embedding call
    pub matching: Duration,
    /// Intent analysis, dominated by one LLM completion (plus retry)
    pub analysis: Duration,
}

impl Default for SynthesisTimeouts {
    fn default() -> Self {
        Self {
            matching: Duration::from_secs(10),
            analysis: Duration::from_secs(90),
        }
    }
}

/// Structured failure surfaced to callers instead of an HTTP error
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisFailure {
    pub category: String,
    pub message: String,
}

/// Result of one synthesis attempt, success or structured failure
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisResult {
    pub request_id: Uuid,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_summary: Option<GraphSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SynthesisFailure>,
    pub duration_ms: u64,
}

/// Aggregate statistics, refreshed from the platform when reachable
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub total_workflows: u64,
    pub active_workflows: u64,
    pub total_executions: u64,
    /// True when platform counts could not be refreshed and the
    /// last-known persisted numbers are reported instead
    pub degraded: bool,
}

struct CreatedWorkflow {
    platform_id: String,
    name: String,
    description: String,
    graph: WorkflowGraph,
}

/// Orchestrates the synthesis pipeline over its collaborators
#[derive(Debug)]
pub struct SynthesisService {
    matcher: Arc<TemplateMatcher>,
    analyzer: IntentAnalyzer,
    builder: GraphBuilder,
    platform: Arc<dyn PlatformAdapter>,
    audit: Arc<dyn AuditRepository>,
    timeouts: SynthesisTimeouts,
}

impl SynthesisService {
    pub fn new(
        matcher: Arc<TemplateMatcher>,
        analyzer: IntentAnalyzer,
        platform: Arc<dyn PlatformAdapter>,
        audit: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            matcher,
            analyzer,
            builder: GraphBuilder::new(),
            platform,
            audit,
            timeouts: SynthesisTimeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: SynthesisTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Run the full pipeline for one request.
    ///
    /// Pipeline-stage failures are returned as a structured failure
    /// result, not an `Err`; only audit persistence problems escape as
    /// errors.
    pub async fn synthesize(
        &self,
        owner_id: &str,
        text: &str,
    ) -> Result<SynthesisResult, DomainError> {
        let started = Instant::now();

        let request = AutomationRequest::new(owner_id, text, self.analyzer.model());
        self.audit.create_request(&request).await?;
        info!(request_id = %request.id(), owner_id, "Synthesis started");

        let mut requirement: Option<Requirement> = None;
        let pipeline = self.run_pipeline(text, &mut requirement).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match pipeline {
            Ok(created) => {
                let graph_value = serde_json::to_value(&created.graph).map_err(|e| {
                    DomainError::internal(format!("Failed to serialize graph: {}", e))
                })?;
                let record = WorkflowRecord::new(
                    created.platform_id.clone(),
                    owner_id,
                    created.name,
                    created.description,
                    request.id(),
                    graph_value,
                );

                let mut outcome =
                    AutomationOutcome::success(request.id(), record.id(), duration_ms);
                if let Some(requirement) = requirement {
                    outcome = outcome.with_requirement(requirement);
                }
                self.audit.record_success(&record, &outcome).await?;

                info!(
                    request_id = %request.id(),
                    workflow_id = %record.id(),
                    platform_id = %created.platform_id,
                    duration_ms,
                    "Synthesis succeeded"
                );

                Ok(SynthesisResult {
                    request_id: request.id(),
                    success: true,
                    workflow_id: Some(record.id()),
                    platform_id: Some(created.platform_id),
                    graph_summary: Some(created.graph.summary()),
                    error: None,
                    duration_ms,
                })
            }
            Err(error) => {
                let mut outcome =
                    AutomationOutcome::failure(request.id(), error.to_string(), duration_ms);
                if let Some(requirement) = requirement {
                    outcome = outcome.with_requirement(requirement);
                }
                self.audit.record_failure(&outcome).await?;

                match &error {
                    // A failed graph validation means the builder broke
                    // its own invariants; a rejected key needs an operator.
                    DomainError::GraphValidation { .. }
                    | DomainError::AuthenticationFailed { .. } => tracing::error!(
                        request_id = %request.id(),
                        category = error.category(),
                        error = %error,
                        duration_ms,
                        "Synthesis failed"
                    ),
                    _ => warn!(
                        request_id = %request.id(),
                        category = error.category(),
                        error = %error,
                        duration_ms,
                        "Synthesis failed"
                    ),
                }

                Ok(SynthesisResult {
                    request_id: request.id(),
                    success: false,
                    workflow_id: None,
                    platform_id: None,
                    graph_summary: None,
                    error: Some(SynthesisFailure {
                        category: error.category().to_string(),
                        message: error.to_string(),
                    }),
                    duration_ms,
                })
            }
        }
    }

    async fn run_pipeline(
        &self,
        text: &str,
        requirement_out: &mut Option<Requirement>,
    ) -> Result<CreatedWorkflow, DomainError> {
        let templates = match timeout(
            self.timeouts.matching,
            self.matcher.find_similar(text, MAX_TEMPLATE_MATCHES),
        )
        .await
        {
            Ok(Ok(matches)) => matches.into_iter().map(|m| m.template).collect(),
            Ok(Err(DomainError::EmbeddingUnavailable { message })) => {
                warn!(error = %message, "Embedding unavailable, proceeding without templates");
                Vec::new()
            }
            Ok(Err(other)) => return Err(other),
            Err(_) => {
                warn!("Template matching timed out, proceeding without templates");
                Vec::new()
            }
        };

        let requirement = match timeout(
            self.timeouts.analysis,
            self.analyzer.analyze(text, &templates),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(DomainError::analysis("Intent analysis timed out")),
        };
        *requirement_out = Some(requirement.clone());

        if !requirement.is_feasible() {
            return Err(DomainError::analysis(
                "Request was judged infeasible for automation",
            ));
        }

        let graph = self.builder.build(&requirement)?;
        let name = workflow_name(text);
        let description = text.trim().to_string();

        let platform_id = self
            .platform
            .create_workflow(&graph, &name, &description)
            .await?;

        Ok(CreatedWorkflow {
            platform_id,
            name,
            description,
            graph,
        })
    }

    /// Persisted workflows for an owner, newest first
    pub async fn list_workflows(
        &self,
        owner_id: &str,
    ) -> Result<Vec<WorkflowRecord>, DomainError> {
        self.audit.list_workflows(owner_id).await
    }

    /// Aggregate statistics.
    ///
    /// Execution totals are refreshed from the platform and written back
    /// to the matching records; when the platform is unreachable the
    /// last-known persisted counts are reported with `degraded: true`.
    pub async fn stats(&self) -> Result<StatsReport, DomainError> {
        let stored: StoredStats = self.audit.stats().await?;

        match self.platform.list_workflows().await {
            Ok(summaries) => {
                let mut executions = 0u64;
                let mut degraded = false;

                for summary in &summaries {
                    match self.platform.execution_count(&summary.id).await {
                        Ok(count) => {
                            executions += count;
                            // The degraded path reads persisted counts,
                            // so each refresh writes back. Platform
                            // workflows without a record are skipped.
                            match self
                                .audit
                                .set_execution_count(&summary.id, count as i64)
                                .await
                            {
                                Ok(()) | Err(DomainError::NotFound { .. }) => {}
                                Err(error) => warn!(
                                    platform_id = %summary.id,
                                    error = %error,
                                    "Could not persist execution count"
                                ),
                            }
                        }
                        Err(error) => {
                            warn!(
                                platform_id = %summary.id,
                                error = %error,
                                "Could not refresh execution count"
                            );
                            degraded = true;
                            break;
                        }
                    }
                }

                Ok(StatsReport {
                    total_workflows: stored.total_workflows,
                    active_workflows: summaries.iter().filter(|s| s.active).count() as u64,
                    total_executions: if degraded {
                        stored.total_executions
                    } else {
                        executions
                    },
                    degraded,
                })
            }
            Err(error) => {
                warn!(error = %error, "Platform unreachable, reporting persisted stats");
                Ok(StatsReport {
                    total_workflows: stored.total_workflows,
                    active_workflows: stored.active_workflows,
                    total_executions: stored.total_executions,
                    degraded: true,
                })
            }
        }
    }
}

/// Derive a workflow name from the request text
fn workflow_name(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "Synthesized workflow".to_string();
    }

    let mut name: String = trimmed.chars().take(MAX_WORKFLOW_NAME_LEN).collect();
    if trimmed.chars().count() > MAX_WORKFLOW_NAME_LEN {
        name.push('…');
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::provider::mock::MockEmbeddingProvider;
    use crate::domain::llm::provider::mock::MockLlmProvider;
    use crate::domain::platform::mock::MockPlatformAdapter;
    use crate::domain::{TemplateId, TemplateRepository, WorkflowTemplate};
    use crate::infrastructure::matcher::TemplateVectorCache;
    use crate::infrastructure::storage::InMemoryAuditStore;
    use crate::infrastructure::templates::InMemoryTemplateRepository;
    use serde_json::json;

    const UPTIME_REPLY: &str = r#"{
        "feasible": true,
        "trigger": "schedule",
        "nodes": ["httpCheck", "condition", "discordNotify"],
        "parameters": {"httpCheck.url": "https://api.example.com/health"},
        "schedule": {"interval_minutes": 5}
    }"#;

    struct Harness {
        service: SynthesisService,
        platform: Arc<MockPlatformAdapter>,
        audit: Arc<InMemoryAuditStore>,
    }

    async fn harness(llm: MockLlmProvider, embedder: MockEmbeddingProvider) -> Harness {
        harness_with_platform(llm, embedder, MockPlatformAdapter::new()).await
    }

    async fn harness_with_platform(
        llm: MockLlmProvider,
        embedder: MockEmbeddingProvider,
        platform: MockPlatformAdapter,
    ) -> Harness {
        let repository: Arc<dyn TemplateRepository> = Arc::new(
            InMemoryTemplateRepository::new().with_template(WorkflowTemplate::new(
                TemplateId::new("uptime-check").unwrap(),
                "Ping a URL on a schedule and notify on failure",
                json!({"nodes": []}),
                vec![0.1; 8],
            )),
        );

        let matcher = Arc::new(TemplateMatcher::new(
            Arc::new(embedder),
            TemplateVectorCache::new(),
        ));
        matcher.warm(&repository).await.unwrap();

        let platform = Arc::new(platform);
        let audit = Arc::new(InMemoryAuditStore::new());

        let service = SynthesisService::new(
            matcher,
            IntentAnalyzer::new(Arc::new(llm), "gpt-4o-mini"),
            platform.clone() as Arc<dyn PlatformAdapter>,
            audit.clone() as Arc<dyn AuditRepository>,
        );

        Harness {
            service,
            platform,
            audit,
        }
    }

    #[tokio::test]
    async fn test_successful_synthesis_persists_record_and_outcome() {
        let h = harness(
            MockLlmProvider::new("mock").with_reply(UPTIME_REPLY),
            MockEmbeddingProvider::new("mock", 8),
        )
        .await;

        let result = h
            .service
            .synthesize("user-1", "check my API every 5 minutes and ping discord if it's down")
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.error.is_none());
        let summary = result.graph_summary.unwrap();
        assert_eq!(summary.node_count, 4);

        assert_eq!(h.platform.created_count(), 1);
        assert_eq!(
            h.platform.created_names(),
            vec!["check my API every 5 minutes and ping discord if it's down"]
        );
        let workflows = h.service.list_workflows("user-1").await.unwrap();
        assert_eq!(workflows.len(), 1);
        assert_eq!(Some(workflows[0].id()), result.workflow_id);

        let outcomes = h
            .audit
            .outcomes_for_request(result.request_id)
            .await
            .unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_success());
        assert!(outcomes[0].requirement().is_some());
    }

    #[tokio::test]
    async fn test_unparseable_analysis_records_one_failure_and_no_record() {
        let h = harness(
            MockLlmProvider::new("mock")
                .with_reply("I think you should use a workflow for that.")
                .with_reply("still not JSON"),
            MockEmbeddingProvider::new("mock", 8),
        )
        .await;

        let result = h.service.synthesize("user-1", "do the thing").await.unwrap();

        assert!(!result.success);
        let failure = result.error.unwrap();
        assert_eq!(failure.category, "AnalysisError");

        assert_eq!(h.platform.created_count(), 0);
        assert!(h.service.list_workflows("user-1").await.unwrap().is_empty());

        let outcomes = h
            .audit
            .outcomes_for_request(result.request_id)
            .await
            .unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].is_success());
    }

    #[tokio::test]
    async fn test_embedding_outage_degrades_instead_of_failing() {
        let h = harness(
            MockLlmProvider::new("mock").with_reply(UPTIME_REPLY),
            MockEmbeddingProvider::new("mock", 8).unavailable("embedding service down"),
        )
        .await;

        let result = h
            .service
            .synthesize("user-1", "check my API every 5 minutes")
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(h.platform.created_count(), 1);
    }

    #[tokio::test]
    async fn test_infeasible_request_fails_before_platform() {
        let h = harness(
            MockLlmProvider::new("mock").with_reply(r#"{"feasible": false}"#),
            MockEmbeddingProvider::new("mock", 8),
        )
        .await;

        let result = h
            .service
            .synthesize("user-1", "physically restart my server")
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.error.unwrap().category, "AnalysisError");
        assert_eq!(h.platform.created_count(), 0);

        // The analyzed requirement is still audited
        let outcomes = h
            .audit
            .outcomes_for_request(result.request_id)
            .await
            .unwrap();
        assert!(outcomes[0].requirement().is_some());
    }

    #[tokio::test]
    async fn test_platform_rejection_is_a_structured_failure() {
        let h = harness_with_platform(
            MockLlmProvider::new("mock").with_reply(UPTIME_REPLY),
            MockEmbeddingProvider::new("mock", 8),
            MockPlatformAdapter::new()
                .failing_create(DomainError::platform_rejected(r#"{"message": "bad node"}"#)),
        )
        .await;

        let result = h
            .service
            .synthesize("user-1", "check my API every 5 minutes")
            .await
            .unwrap();

        assert!(!result.success);
        let failure = result.error.unwrap();
        assert_eq!(failure.category, "PlatformRejected");
        assert!(failure.message.contains("bad node"));

        assert!(h.service.list_workflows("user-1").await.unwrap().is_empty());
        let outcomes = h
            .audit
            .outcomes_for_request(result.request_id)
            .await
            .unwrap();
        assert_eq!(outcomes.len(), 1);
    }

    #[tokio::test]
    async fn test_stats_refreshes_from_platform() {
        let h = harness_with_platform(
            MockLlmProvider::new("mock").with_reply(UPTIME_REPLY),
            MockEmbeddingProvider::new("mock", 8),
            MockPlatformAdapter::new().with_execution_count("wf-0", 7),
        )
        .await;

        h.service
            .synthesize("user-1", "check my API every 5 minutes")
            .await
            .unwrap();

        let report = h.service.stats().await.unwrap();
        assert_eq!(report.total_workflows, 1);
        assert_eq!(report.total_executions, 7);
        assert!(!report.degraded);
    }

    #[tokio::test]
    async fn test_stats_falls_back_when_executions_unreachable() {
        let h = harness_with_platform(
            MockLlmProvider::new("mock").with_reply(UPTIME_REPLY),
            MockEmbeddingProvider::new("mock", 8),
            MockPlatformAdapter::new().with_unreachable_executions(),
        )
        .await;

        h.service
            .synthesize("user-1", "check my API every 5 minutes")
            .await
            .unwrap();
        h.audit.set_execution_count("wf-0", 42).await.unwrap();

        let report = h.service.stats().await.unwrap();
        assert!(report.degraded);
        assert_eq!(report.total_executions, 42);
    }

    #[tokio::test]
    async fn test_stats_keeps_refreshed_counts_after_platform_goes_down() {
        let h = harness_with_platform(
            MockLlmProvider::new("mock").with_reply(UPTIME_REPLY),
            MockEmbeddingProvider::new("mock", 8),
            MockPlatformAdapter::new().with_execution_count("wf-0", 7),
        )
        .await;

        h.service
            .synthesize("user-1", "check my API every 5 minutes")
            .await
            .unwrap();

        // A successful refresh persists the counts it saw.
        let live = h.service.stats().await.unwrap();
        assert_eq!(live.total_executions, 7);
        assert!(!live.degraded);

        h.platform.make_executions_unreachable();

        let fallback = h.service.stats().await.unwrap();
        assert!(fallback.degraded);
        assert_eq!(fallback.total_executions, 7);
    }

    #[test]
    fn test_workflow_name_truncation() {
        assert_eq!(workflow_name("  check my API  "), "check my API");
        assert_eq!(workflow_name(""), "Synthesized workflow");

        let long = "a".repeat(100);
        let name = workflow_name(&long);
        assert_eq!(name.chars().count(), MAX_WORKFLOW_NAME_LEN + 1);
        assert!(name.ends_with('…'));
    }
}
