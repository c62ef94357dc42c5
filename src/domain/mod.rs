//! Domain layer: entities, collaborator traits and repository boundaries

pub mod audit;
pub mod embedding;
pub mod error;
pub mod graph;
pub mod llm;
pub mod platform;
pub mod requirement;
pub mod template;

pub use audit::{
    AuditRepository, AutomationOutcome, AutomationRequest, StoredStats, WorkflowRecord,
    WorkflowStatus,
};
pub use embedding::EmbeddingProvider;
pub use error::DomainError;
pub use graph::{GraphSummary, Node, NodeClass, NodeId, Position, WorkflowGraph};
pub use llm::{CompletionRequest, CompletionResponse, LlmProvider};
pub use platform::{PlatformAdapter, PlatformWorkflowSummary};
pub use requirement::{NodeKind, Requirement, Schedule, TriggerKind};
pub use template::{TemplateId, TemplateRepository, WorkflowTemplate};
