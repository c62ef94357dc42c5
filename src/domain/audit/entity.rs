//! Audit entities: requests, persisted workflows and outcomes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::requirement::Requirement;

/// Immutable record of one synthesis attempt's input.
///
/// Created when a request arrives; never mutated; referenced by the
/// resulting outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationRequest {
    id: Uuid,
    owner_id: String,
    text: String,
    model: String,
    created_at: DateTime<Utc>,
}

impl AutomationRequest {
    pub fn new(owner_id: impl Into<String>, text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            text: text.into(),
            model: model.into(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Lifecycle status of a persisted workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Created,
    Active,
    Failed,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Active => "active",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(Self::Created),
            "active" => Some(Self::Active),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// The persisted, platform-confirmed workflow.
///
/// Soft-deleted, never hard-deleted, to preserve the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRecord {
    id: Uuid,
    platform_id: String,
    owner_id: String,
    name: String,
    description: String,
    request_id: Uuid,
    graph: serde_json::Value,
    status: WorkflowStatus,
    execution_count: i64,
    deleted: bool,
    created_at: DateTime<Utc>,
}

impl WorkflowRecord {
    pub fn new(
        platform_id: impl Into<String>,
        owner_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        request_id: Uuid,
        graph: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            platform_id: platform_id.into(),
            owner_id: owner_id.into(),
            name: name.into(),
            description: description.into(),
            request_id,
            graph,
            status: WorkflowStatus::Created,
            execution_count: 0,
            deleted: false,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn platform_id(&self) -> &str {
        &self.platform_id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn graph(&self) -> &serde_json::Value {
        &self.graph
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    pub fn execution_count(&self) -> i64 {
        self.execution_count
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_status(&mut self, status: WorkflowStatus) {
        self.status = status;
    }

    pub fn set_execution_count(&mut self, count: i64) {
        self.execution_count = count;
    }

    pub fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    /// Reconstruct a record from persisted columns
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        platform_id: String,
        owner_id: String,
        name: String,
        description: String,
        request_id: Uuid,
        graph: serde_json::Value,
        status: WorkflowStatus,
        execution_count: i64,
        deleted: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            platform_id,
            owner_id,
            name,
            description,
            request_id,
            graph,
            status,
            execution_count,
            deleted,
            created_at,
        }
    }
}

/// Append-only audit row for one synthesis attempt. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationOutcome {
    id: Uuid,
    request_id: Uuid,
    workflow_record_id: Option<Uuid>,
    success: bool,
    error: Option<String>,
    duration_ms: u64,
    requirement: Option<Requirement>,
    created_at: DateTime<Utc>,
}

impl AutomationOutcome {
    /// Outcome of a successful synthesis
    pub fn success(request_id: Uuid, workflow_record_id: Uuid, duration_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            request_id,
            workflow_record_id: Some(workflow_record_id),
            success: true,
            error: None,
            duration_ms,
            requirement: None,
            created_at: Utc::now(),
        }
    }

    /// Outcome of a failed synthesis
    pub fn failure(request_id: Uuid, error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            request_id,
            workflow_record_id: None,
            success: false,
            error: Some(error.into()),
            duration_ms,
            requirement: None,
            created_at: Utc::now(),
        }
    }

    /// Attach the analyzed requirement snapshot for audit
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirement = Some(requirement);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn workflow_record_id(&self) -> Option<Uuid> {
        self.workflow_record_id
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn requirement(&self) -> Option<&Requirement> {
        self.requirement.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Aggregate statistics over persisted workflows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StoredStats {
    pub total_workflows: u64,
    pub active_workflows: u64,
    pub total_executions: u64,
}
