//! Workflow templates: stored example graphs used to ground generation

pub mod entity;
pub mod repository;

pub use entity::{TemplateId, WorkflowTemplate};
pub use repository::TemplateRepository;
