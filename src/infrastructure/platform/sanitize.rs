//! Payload sanitization for the orchestration platform API
//!
//! The platform rejects create requests that carry server-managed fields
//! or `null` where an object is required. Sanitization is idempotent so
//! retried payloads never drift.

use serde_json::{Map, Value};

/// Server-managed fields the create endpoint refuses to accept.
const READ_ONLY_FIELDS: &[&str] = &["id", "active", "tags", "createdAt", "updatedAt", "versionId"];

/// Top-level fields that must be objects, never `null` or absent.
const REQUIRED_OBJECT_FIELDS: &[&str] = &["settings", "staticData"];

/// Per-node fields that must be objects when present.
const NODE_OBJECT_FIELDS: &[&str] = &["parameters", "credentials"];

/// Sanitize a workflow payload in place before sending it to the platform.
pub fn sanitize_workflow_payload(payload: &mut Value) {
    let Some(object) = payload.as_object_mut() else {
        return;
    };

    for field in READ_ONLY_FIELDS {
        object.remove(*field);
    }

    for field in REQUIRED_OBJECT_FIELDS {
        match object.get_mut(*field) {
            Some(value) if value.is_object() => {}
            _ => {
                object.insert((*field).to_string(), Value::Object(Map::new()));
            }
        }
    }

    if let Some(nodes) = object.get_mut("nodes").and_then(Value::as_array_mut) {
        for node in nodes {
            let Some(node_object) = node.as_object_mut() else {
                continue;
            };
            for field in NODE_OBJECT_FIELDS {
                if matches!(node_object.get(*field), Some(Value::Null)) {
                    node_object.insert((*field).to_string(), Value::Object(Map::new()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_read_only_fields() {
        let mut payload = json!({
            "id": "wf-1",
            "active": true,
            "tags": ["a"],
            "createdAt": "2024-01-01",
            "updatedAt": "2024-01-02",
            "versionId": "v1",
            "name": "Check API"
        });

        sanitize_workflow_payload(&mut payload);

        for field in READ_ONLY_FIELDS {
            assert!(payload.get(*field).is_none(), "{} should be removed", field);
        }
        assert_eq!(payload["name"], "Check API");
    }

    #[test]
    fn test_null_settings_becomes_empty_object() {
        let mut payload = json!({
            "name": "Check API",
            "settings": null
        });

        sanitize_workflow_payload(&mut payload);

        assert_eq!(payload["settings"], json!({}));
        assert_eq!(payload["staticData"], json!({}));
    }

    #[test]
    fn test_populated_settings_is_preserved() {
        let mut payload = json!({
            "name": "Check API",
            "settings": {"executionOrder": "v1"},
            "staticData": {}
        });

        sanitize_workflow_payload(&mut payload);

        assert_eq!(payload["settings"], json!({"executionOrder": "v1"}));
    }

    #[test]
    fn test_node_null_fields_become_objects() {
        let mut payload = json!({
            "name": "Check API",
            "nodes": [
                {"name": "trigger", "parameters": null, "credentials": null},
                {"name": "node-1", "parameters": {"url": "https://api.example.com"}}
            ]
        });

        sanitize_workflow_payload(&mut payload);

        assert_eq!(payload["nodes"][0]["parameters"], json!({}));
        assert_eq!(payload["nodes"][0]["credentials"], json!({}));
        assert_eq!(
            payload["nodes"][1]["parameters"]["url"],
            "https://api.example.com"
        );
        // Absent credentials stay absent
        assert!(payload["nodes"][1].get("credentials").is_none());
    }

    #[test]
    fn test_sanitization_is_idempotent() {
        let mut payload = json!({
            "id": "wf-1",
            "name": "Check API",
            "settings": null,
            "nodes": [{"name": "trigger", "parameters": null}]
        });

        sanitize_workflow_payload(&mut payload);
        let once = payload.clone();
        sanitize_workflow_payload(&mut payload);

        assert_eq!(payload, once);
    }
}
