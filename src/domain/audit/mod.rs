//! Audit & storage domain: requests, records, outcomes, statistics

pub mod entity;
pub mod repository;

pub use entity::{
    AutomationOutcome, AutomationRequest, StoredStats, WorkflowRecord, WorkflowStatus,
};
pub use repository::AuditRepository;
