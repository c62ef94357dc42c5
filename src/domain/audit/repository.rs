//! Audit repository trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use uuid::Uuid;

use super::entity::{
    AutomationOutcome, AutomationRequest, StoredStats, WorkflowRecord, WorkflowStatus,
};
use crate::domain::DomainError;

/// Persistence boundary for requests, workflow records and outcomes.
///
/// `record_success` is the single transactional write in the system: the
/// record and its outcome are persisted together or not at all, so no
/// workflow record can exist without the outcome proving why it does.
#[async_trait]
pub trait AuditRepository: Send + Sync + Debug {
    /// Persist an incoming automation request
    async fn create_request(&self, request: &AutomationRequest) -> Result<(), DomainError>;

    /// Atomically persist a workflow record and its success outcome
    async fn record_success(
        &self,
        record: &WorkflowRecord,
        outcome: &AutomationOutcome,
    ) -> Result<(), DomainError>;

    /// Persist a failure outcome (no workflow record is created)
    async fn record_failure(&self, outcome: &AutomationOutcome) -> Result<(), DomainError>;

    /// Workflows for an owner, excluding soft-deleted records
    async fn list_workflows(&self, owner_id: &str) -> Result<Vec<WorkflowRecord>, DomainError>;

    /// Fetch one workflow record
    async fn get_workflow(&self, id: Uuid) -> Result<Option<WorkflowRecord>, DomainError>;

    /// Update a record's lifecycle status
    async fn set_status(&self, id: Uuid, status: WorkflowStatus) -> Result<(), DomainError>;

    /// Soft-delete a record, preserving the audit trail
    async fn soft_delete(&self, id: Uuid) -> Result<(), DomainError>;

    /// Store the last-known execution count for the live record created
    /// from a platform workflow. Counts arrive from platform refreshes,
    /// which only know platform ids.
    async fn set_execution_count(&self, platform_id: &str, count: i64)
        -> Result<(), DomainError>;

    /// Outcomes recorded for a request, oldest first
    async fn outcomes_for_request(
        &self,
        request_id: Uuid,
    ) -> Result<Vec<AutomationOutcome>, DomainError>;

    /// Aggregate statistics from persisted state only
    async fn stats(&self) -> Result<StoredStats, DomainError>;
}
