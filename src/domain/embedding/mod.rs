//! Embedding collaborator interface and vector math

pub mod provider;
pub mod vector;

pub use provider::EmbeddingProvider;
pub use vector::{cosine_similarity, similarity_score};
