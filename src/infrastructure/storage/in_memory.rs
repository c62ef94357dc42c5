//! In-memory audit store for testing and development

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    AuditRepository, AutomationOutcome, AutomationRequest, DomainError, StoredStats,
    WorkflowRecord, WorkflowStatus,
};

#[derive(Debug, Default)]
struct Inner {
    requests: Vec<AutomationRequest>,
    records: Vec<WorkflowRecord>,
    outcomes: Vec<AutomationOutcome>,
}

/// In-memory implementation of AuditRepository.
///
/// A single mutex guards all three collections so `record_success` is
/// atomic the same way the PostgreSQL transaction is.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    inner: Mutex<Inner>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, DomainError> {
        self.inner
            .lock()
            .map_err(|_| DomainError::storage("Audit store lock poisoned"))
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditStore {
    async fn create_request(&self, request: &AutomationRequest) -> Result<(), DomainError> {
        let mut inner = self.lock()?;
        inner.requests.push(request.clone());
        Ok(())
    }

    async fn record_success(
        &self,
        record: &WorkflowRecord,
        outcome: &AutomationOutcome,
    ) -> Result<(), DomainError> {
        let mut inner = self.lock()?;
        inner.records.push(record.clone());
        inner.outcomes.push(outcome.clone());
        Ok(())
    }

    async fn record_failure(&self, outcome: &AutomationOutcome) -> Result<(), DomainError> {
        let mut inner = self.lock()?;
        inner.outcomes.push(outcome.clone());
        Ok(())
    }

    async fn list_workflows(&self, owner_id: &str) -> Result<Vec<WorkflowRecord>, DomainError> {
        let inner = self.lock()?;
        let mut records: Vec<WorkflowRecord> = inner
            .records
            .iter()
            .filter(|r| r.owner_id() == owner_id && !r.is_deleted())
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(records)
    }

    async fn get_workflow(&self, id: Uuid) -> Result<Option<WorkflowRecord>, DomainError> {
        let inner = self.lock()?;
        Ok(inner.records.iter().find(|r| r.id() == id).cloned())
    }

    async fn set_status(&self, id: Uuid, status: WorkflowStatus) -> Result<(), DomainError> {
        let mut inner = self.lock()?;
        match inner.records.iter_mut().find(|r| r.id() == id) {
            Some(record) => {
                record.set_status(status);
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "Workflow record '{}' not found",
                id
            ))),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut inner = self.lock()?;
        match inner.records.iter_mut().find(|r| r.id() == id) {
            Some(record) => {
                record.mark_deleted();
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "Workflow record '{}' not found",
                id
            ))),
        }
    }

    async fn set_execution_count(&self, platform_id: &str, count: i64) -> Result<(), DomainError> {
        let mut inner = self.lock()?;
        match inner
            .records
            .iter_mut()
            .find(|r| r.platform_id() == platform_id && !r.is_deleted())
        {
            Some(record) => {
                record.set_execution_count(count);
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "No live workflow record for platform id '{}'",
                platform_id
            ))),
        }
    }

    async fn outcomes_for_request(
        &self,
        request_id: Uuid,
    ) -> Result<Vec<AutomationOutcome>, DomainError> {
        let inner = self.lock()?;
        Ok(inner
            .outcomes
            .iter()
            .filter(|o| o.request_id() == request_id)
            .cloned()
            .collect())
    }

    async fn stats(&self) -> Result<StoredStats, DomainError> {
        let inner = self.lock()?;
        let live = inner.records.iter().filter(|r| !r.is_deleted());

        let mut stats = StoredStats::default();
        for record in live {
            stats.total_workflows += 1;
            if record.status() == WorkflowStatus::Active {
                stats.active_workflows += 1;
            }
            stats.total_executions += record.execution_count().max(0) as u64;
        }
        Ok(stats)
    }
}
