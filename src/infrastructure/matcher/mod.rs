//! Semantic template matcher
//!
//! Embeds an incoming request and ranks the cached template corpus by
//! cosine similarity, descending, ties broken by template id.

pub mod cache;

pub use cache::TemplateVectorCache;

use std::sync::Arc;

use tracing::debug;

use crate::domain::embedding::{cosine_similarity, similarity_score};
use crate::domain::{DomainError, EmbeddingProvider, TemplateRepository, WorkflowTemplate};

/// A matched template with its similarity score in [0, 1]
#[derive(Debug, Clone)]
pub struct TemplateMatch {
    pub template: WorkflowTemplate,
    pub score: f32,
}

/// Ranks stored templates against a request text
#[derive(Debug)]
pub struct TemplateMatcher {
    embedder: Arc<dyn EmbeddingProvider>,
    cache: TemplateVectorCache,
}

impl TemplateMatcher {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, cache: TemplateVectorCache) -> Self {
        Self { embedder, cache }
    }

    /// Populate the cache from the repository
    pub async fn warm(&self, repository: &Arc<dyn TemplateRepository>) -> Result<usize, DomainError> {
        self.cache.refresh(repository).await
    }

    /// Top-k most similar templates, descending score.
    ///
    /// Fails with `EmbeddingUnavailable` when the embedding collaborator
    /// is unreachable; callers proceed with zero templates.
    pub async fn find_similar(
        &self,
        request_text: &str,
        k: usize,
    ) -> Result<Vec<TemplateMatch>, DomainError> {
        if k == 0 || self.cache.is_empty() {
            return Ok(Vec::new());
        }

        let query = self.embedder.embed(request_text).await?;

        let mut matches: Vec<TemplateMatch> = self
            .cache
            .snapshot()?
            .into_iter()
            .map(|template| {
                let score = similarity_score(cosine_similarity(&query, template.embedding()));
                TemplateMatch { template, score }
            })
            .collect();

        // Descending score; ties broken by template id for determinism
        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.template.id().cmp(b.template.id()))
        });
        matches.truncate(k);

        debug!(
            count = matches.len(),
            top_score = matches.first().map(|m| m.score),
            "Matched templates"
        );

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::provider::mock::MockEmbeddingProvider;
    use crate::domain::template::TemplateId;
    use crate::infrastructure::templates::InMemoryTemplateRepository;
    use serde_json::json;

    fn template(id: &str, embedding: Vec<f32>) -> WorkflowTemplate {
        WorkflowTemplate::new(
            TemplateId::new(id).unwrap(),
            format!("template {}", id),
            json!({"nodes": []}),
            embedding,
        )
    }

    async fn matcher_with(
        embedder: MockEmbeddingProvider,
        templates: Vec<WorkflowTemplate>,
    ) -> TemplateMatcher {
        let mut repo = InMemoryTemplateRepository::new();
        for t in templates {
            repo = repo.with_template(t);
        }
        let repo: Arc<dyn TemplateRepository> = Arc::new(repo);

        let matcher = TemplateMatcher::new(Arc::new(embedder), TemplateVectorCache::new());
        matcher.warm(&repo).await.unwrap();
        matcher
    }

    #[tokio::test]
    async fn test_find_similar_orders_by_score() {
        // Mock embedder is deterministic per text; use templates whose
        // vectors differ in alignment with the query vector.
        let embedder = MockEmbeddingProvider::new("test", 4);
        let query = embedder.embed("check uptime").await.unwrap();

        let aligned = query.clone();
        let mut anti = query.clone();
        for v in &mut anti {
            *v = -*v;
        }

        let matcher = matcher_with(
            MockEmbeddingProvider::new("test", 4),
            vec![template("anti", anti), template("aligned", aligned)],
        )
        .await;

        let matches = matcher.find_similar("check uptime", 5).await.unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].template.id().as_str(), "aligned");
        assert!((matches[0].score - 1.0).abs() < 0.0001);
        assert_eq!(matches[1].score, 0.0);
    }

    #[tokio::test]
    async fn test_find_similar_tie_break_by_id() {
        let embedder = MockEmbeddingProvider::new("test", 4);
        let query = embedder.embed("request").await.unwrap();

        let matcher = matcher_with(
            MockEmbeddingProvider::new("test", 4),
            vec![
                template("zzz", query.clone()),
                template("aaa", query.clone()),
            ],
        )
        .await;

        let matches = matcher.find_similar("request", 2).await.unwrap();

        assert_eq!(matches[0].template.id().as_str(), "aaa");
        assert_eq!(matches[1].template.id().as_str(), "zzz");
    }

    #[tokio::test]
    async fn test_find_similar_truncates_to_k() {
        let matcher = matcher_with(
            MockEmbeddingProvider::new("test", 4),
            vec![
                template("a", vec![1.0, 0.0, 0.0, 0.0]),
                template("b", vec![0.0, 1.0, 0.0, 0.0]),
                template("c", vec![0.0, 0.0, 1.0, 0.0]),
            ],
        )
        .await;

        let matches = matcher.find_similar("request", 2).await.unwrap();

        assert_eq!(matches.len(), 2);
    }

    #[tokio::test]
    async fn test_find_similar_embedding_unavailable() {
        let matcher = matcher_with(
            MockEmbeddingProvider::new("test", 4).unavailable("down"),
            vec![template("a", vec![1.0, 0.0, 0.0, 0.0])],
        )
        .await;

        let result = matcher.find_similar("request", 3).await;

        assert!(matches!(
            result,
            Err(DomainError::EmbeddingUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_cache_short_circuits_embedder() {
        // No templates cached: not even an unreachable embedder matters.
        let matcher = TemplateMatcher::new(
            Arc::new(MockEmbeddingProvider::new("test", 4).unavailable("down")),
            TemplateVectorCache::new(),
        );

        let matches = matcher.find_similar("request", 3).await.unwrap();

        assert!(matches.is_empty());
    }
}
