//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for embedding providers (OpenAI, Cohere, etc.)
///
/// Unreachable providers fail with `DomainError::EmbeddingUnavailable`;
/// the template matcher's callers treat that as non-fatal.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate an embedding vector for the given text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Fixed dimensionality of produced vectors
    fn dimensions(&self) -> usize;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        name: &'static str,
        dimensions: usize,
        unavailable: Option<String>,
    }

    impl MockEmbeddingProvider {
        pub fn new(name: &'static str, dimensions: usize) -> Self {
            Self {
                name,
                dimensions,
                unavailable: None,
            }
        }

        pub fn unavailable(mut self, message: impl Into<String>) -> Self {
            self.unavailable = Some(message.into());
            self
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
            if let Some(ref message) = self.unavailable {
                return Err(DomainError::embedding_unavailable(message));
            }

            // Deterministic vector derived from the text bytes
            let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_add(b as u64));
            let vector = (0..self.dimensions)
                .map(|i| ((hash.wrapping_add(i as u64) % 1000) as f32 / 1000.0) - 0.5)
                .collect();

            Ok(vector)
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_provider_dimensions() {
            let provider = MockEmbeddingProvider::new("test", 128);

            let vector = provider.embed("Hello").await.unwrap();

            assert_eq!(vector.len(), 128);
        }

        #[tokio::test]
        async fn test_mock_provider_deterministic() {
            let provider = MockEmbeddingProvider::new("test", 64);

            let v1 = provider.embed("Hello").await.unwrap();
            let v2 = provider.embed("Hello").await.unwrap();

            assert_eq!(v1, v2);
        }

        #[tokio::test]
        async fn test_mock_provider_unavailable() {
            let provider =
                MockEmbeddingProvider::new("test", 64).unavailable("connection refused");

            let result = provider.embed("Hello").await;

            assert!(matches!(
                result,
                Err(DomainError::EmbeddingUnavailable { .. })
            ));
        }
    }
}
