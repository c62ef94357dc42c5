//! Explicitly scoped cache of template vectors
//!
//! Constructed once, handed to the matcher, refreshed on a schedule or
//! after template-store mutations. Never module-level state.

use std::sync::{Arc, RwLock};

use crate::domain::{DomainError, TemplateRepository, WorkflowTemplate};

/// Snapshot of the template corpus held in memory for matching
#[derive(Debug, Default)]
pub struct TemplateVectorCache {
    entries: RwLock<Vec<WorkflowTemplate>>,
}

impl TemplateVectorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload the cache from the repository
    pub async fn refresh(&self, repository: &Arc<dyn TemplateRepository>) -> Result<usize, DomainError> {
        let templates = repository.list().await?;
        let count = templates.len();

        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(format!("template cache lock poisoned: {}", e)))?;
        *entries = templates;

        Ok(count)
    }

    /// Current snapshot, cheapest possible copy for scoring
    pub fn snapshot(&self) -> Result<Vec<WorkflowTemplate>, DomainError> {
        self.entries
            .read()
            .map(|entries| entries.clone())
            .map_err(|e| DomainError::internal(format!("template cache lock poisoned: {}", e)))
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
