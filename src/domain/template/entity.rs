//! Workflow template entity

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Maximum length for template IDs
pub const MAX_ID_LENGTH: usize = 64;

/// Regex pattern for valid template IDs: alphanumeric and hyphens
static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9]$|^[a-zA-Z0-9]$").unwrap());

/// Validated template identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemplateId(String);

impl TemplateId {
    /// Create a new validated template ID
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();

        if id.is_empty() {
            return Err(DomainError::validation("Template ID cannot be empty"));
        }

        if id.len() > MAX_ID_LENGTH {
            return Err(DomainError::validation(format!(
                "Template ID exceeds maximum length of {} characters",
                MAX_ID_LENGTH
            )));
        }

        if !ID_PATTERN.is_match(&id) {
            return Err(DomainError::validation(format!(
                "Invalid template ID '{}': must be alphanumeric with hyphens, start and end with alphanumeric",
                id
            )));
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TemplateId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TemplateId> for String {
    fn from(id: TemplateId) -> Self {
        id.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reference example workflow used to ground generation.
///
/// Created by offline ingestion; read-only to the synthesis engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowTemplate {
    /// Unique template identifier
    id: TemplateId,

    /// Human-readable description of what the workflow does
    description: String,

    /// Serialized example graph
    graph: serde_json::Value,

    /// Embedding vector of the description
    embedding: Vec<f32>,
}

impl WorkflowTemplate {
    /// Create a new template
    pub fn new(
        id: TemplateId,
        description: impl Into<String>,
        graph: serde_json::Value,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            graph,
            embedding,
        }
    }

    pub fn id(&self) -> &TemplateId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn graph(&self) -> &serde_json::Value {
        &self.graph
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_id_valid() {
        assert!(TemplateId::new("uptime-check").is_ok());
        assert!(TemplateId::new("tpl1").is_ok());
        assert!(TemplateId::new("a").is_ok());
    }

    #[test]
    fn test_template_id_invalid() {
        assert!(TemplateId::new("").is_err());
        assert!(TemplateId::new("-leading").is_err());
        assert!(TemplateId::new("trailing-").is_err());
        assert!(TemplateId::new("has spaces").is_err());

        let long_id = "a".repeat(65);
        assert!(TemplateId::new(long_id).is_err());
    }

    #[test]
    fn test_template_id_ordering() {
        let a = TemplateId::new("aaa").unwrap();
        let b = TemplateId::new("bbb").unwrap();

        assert!(a < b);
    }

    #[test]
    fn test_template_accessors() {
        let id = TemplateId::new("uptime-check").unwrap();
        let template = WorkflowTemplate::new(
            id.clone(),
            "Check a site every 5 minutes",
            json!({"nodes": []}),
            vec![0.1, 0.2, 0.3],
        );

        assert_eq!(template.id(), &id);
        assert_eq!(template.description(), "Check a site every 5 minutes");
        assert_eq!(template.dimensions(), 3);
    }

    #[test]
    fn test_template_id_serialization() {
        let id = TemplateId::new("uptime-check").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"uptime-check\"");

        let deserialized: TemplateId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
