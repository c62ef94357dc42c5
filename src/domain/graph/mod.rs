//! Workflow graph entities and structural validation

pub mod entity;
pub mod validate;

pub use entity::{GraphSummary, Node, NodeClass, NodeId, Position, WorkflowGraph};
pub use validate::validate;
