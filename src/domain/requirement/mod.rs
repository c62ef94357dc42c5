//! Structured intent requirements and their parser

pub mod entity;
pub mod parser;

pub use entity::{NodeKind, Requirement, Schedule, TriggerKind};
pub use parser::{extract_json, parse_requirement};
