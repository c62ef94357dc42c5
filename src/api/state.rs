//! Application state for shared services

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{DomainError, WorkflowRecord};
use crate::infrastructure::services::{StatsReport, SynthesisResult, SynthesisService};

/// Synthesis operations exposed to the API layer
#[async_trait]
pub trait SynthesisApi: Send + Sync {
    async fn synthesize(&self, owner_id: &str, text: &str)
        -> Result<SynthesisResult, DomainError>;

    async fn list_workflows(&self, owner_id: &str) -> Result<Vec<WorkflowRecord>, DomainError>;

    async fn stats(&self) -> Result<StatsReport, DomainError>;
}

#[async_trait]
impl SynthesisApi for SynthesisService {
    async fn synthesize(
        &self,
        owner_id: &str,
        text: &str,
    ) -> Result<SynthesisResult, DomainError> {
        SynthesisService::synthesize(self, owner_id, text).await
    }

    async fn list_workflows(&self, owner_id: &str) -> Result<Vec<WorkflowRecord>, DomainError> {
        SynthesisService::list_workflows(self, owner_id).await
    }

    async fn stats(&self) -> Result<StatsReport, DomainError> {
        SynthesisService::stats(self).await
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub synthesis: Arc<dyn SynthesisApi>,
}

impl AppState {
    pub fn new(synthesis: Arc<dyn SynthesisApi>) -> Self {
        Self { synthesis }
    }
}
