//! Template repository trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use super::{TemplateId, WorkflowTemplate};
use crate::domain::DomainError;

/// Read-mostly store of workflow templates.
///
/// Invariant: all stored embeddings share one dimensionality; backends
/// enforce this on insert.
#[async_trait]
pub trait TemplateRepository: Send + Sync + Debug {
    /// Retrieve a template by id
    async fn get(&self, id: &TemplateId) -> Result<Option<WorkflowTemplate>, DomainError>;

    /// Retrieve all templates
    async fn list(&self) -> Result<Vec<WorkflowTemplate>, DomainError>;

    /// Add a template, rejecting dimension mismatches and duplicate ids
    async fn add(&self, template: WorkflowTemplate) -> Result<(), DomainError>;

    /// Number of stored templates
    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }
}
