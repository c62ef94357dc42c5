//! In-memory template repository

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{DomainError, TemplateId, TemplateRepository, WorkflowTemplate};

/// In-memory template store.
///
/// Enforces the fixed-dimensionality invariant on insert.
#[derive(Debug, Default)]
pub struct InMemoryTemplateRepository {
    templates: RwLock<Vec<WorkflowTemplate>>,
}

impl InMemoryTemplateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert for construction and tests; panics on a
    /// dimension mismatch, so only use with known-good data. Owning
    /// `self` means no lock is taken, so poisoning cannot panic here.
    pub fn with_template(mut self, template: WorkflowTemplate) -> Self {
        let templates = self
            .templates
            .get_mut()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(first) = templates.first() {
            assert_eq!(
                first.dimensions(),
                template.dimensions(),
                "template embedding dimensions must match"
            );
        }
        templates.push(template);
        self
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn get(&self, id: &TemplateId) -> Result<Option<WorkflowTemplate>, DomainError> {
        let templates = self
            .templates
            .read()
            .map_err(|e| DomainError::internal(format!("template lock poisoned: {}", e)))?;

        Ok(templates.iter().find(|t| t.id() == id).cloned())
    }

    async fn list(&self) -> Result<Vec<WorkflowTemplate>, DomainError> {
        let templates = self
            .templates
            .read()
            .map_err(|e| DomainError::internal(format!("template lock poisoned: {}", e)))?;

        Ok(templates.clone())
    }

    async fn add(&self, template: WorkflowTemplate) -> Result<(), DomainError> {
        let mut templates = self
            .templates
            .write()
            .map_err(|e| DomainError::internal(format!("template lock poisoned: {}", e)))?;

        if templates.iter().any(|t| t.id() == template.id()) {
            return Err(DomainError::validation(format!(
                "template '{}' already exists",
                template.id()
            )));
        }

        if let Some(first) = templates.first() {
            if first.dimensions() != template.dimensions() {
                return Err(DomainError::validation(format!(
                    "embedding dimensions {} do not match store dimensions {}",
                    template.dimensions(),
                    first.dimensions()
                )));
            }
        }

        templates.push(template);
        Ok(())
    }
}
