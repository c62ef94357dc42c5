//! Orchestration-platform collaborator interface

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::graph::WorkflowGraph;
use crate::domain::DomainError;

/// Workflow summary as reported by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformWorkflowSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

/// Narrow interface over the orchestration platform's REST API.
///
/// Implementations own payload translation, sanitization, auth headers
/// and retry; callers see only domain errors.
#[async_trait]
pub trait PlatformAdapter: Send + Sync + Debug {
    /// Create a workflow from a graph; returns the platform-assigned id
    async fn create_workflow(
        &self,
        graph: &WorkflowGraph,
        name: &str,
        description: &str,
    ) -> Result<String, DomainError>;

    /// List workflows known to the platform
    async fn list_workflows(&self) -> Result<Vec<PlatformWorkflowSummary>, DomainError>;

    /// Number of recorded executions for a workflow. Eventually
    /// consistent; used for statistics, not billing.
    async fn execution_count(&self, platform_id: &str) -> Result<u64, DomainError>;

    /// Trigger an execution of a workflow
    async fn execute(&self, platform_id: &str) -> Result<(), DomainError>;
}
