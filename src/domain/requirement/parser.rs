//! Strict parser for model-emitted requirement JSON
//!
//! Follows "parse, don't validate": the open-ended parts of the schema
//! (node labels, trigger labels) map onto safe defaults instead of
//! failing, while structurally broken responses are rejected.

use std::collections::BTreeMap;

use serde_json::Value;

use super::entity::{NodeKind, Requirement, Schedule, TriggerKind};
use crate::domain::DomainError;

/// Extract the first JSON object from raw model output.
///
/// Models wrap JSON in prose or markdown fences often enough that the
/// analyzer scrubs before parsing.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();

    // Fast path: the whole response is the object
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if value.is_object() {
            return Some(value);
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }

    serde_json::from_str::<Value>(&trimmed[start..=end])
        .ok()
        .filter(Value::is_object)
}

/// Parse a requirement from an extracted JSON object
pub fn parse_requirement(value: &Value) -> Result<Requirement, DomainError> {
    let object = value
        .as_object()
        .ok_or_else(|| DomainError::analysis("requirement must be a JSON object"))?;

    // Feasible defaults to true; only an explicit false rejects.
    let feasible = object
        .get("feasible")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    let trigger = object
        .get("trigger")
        .or_else(|| object.get("triggerKind"))
        .and_then(Value::as_str)
        .map(TriggerKind::from_label)
        .unwrap_or_default();

    let node_kinds = match object.get("nodes").or_else(|| object.get("nodeKinds")) {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(NodeKind::from_label)
                    .ok_or_else(|| DomainError::analysis("node entries must be strings"))
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(DomainError::analysis("nodes must be an array")),
        None => Vec::new(),
    };

    let parameters = match object.get("parameters") {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<BTreeMap<_, _>>(),
        Some(Value::Null) | None => BTreeMap::new(),
        Some(_) => return Err(DomainError::analysis("parameters must be an object")),
    };

    let schedule = object.get("schedule").and_then(parse_schedule);

    let mut requirement = Requirement::new(trigger)
        .with_feasible(feasible)
        .with_node_kinds(node_kinds)
        .with_parameters(parameters);

    if let Some(schedule) = schedule {
        requirement = requirement.with_schedule(schedule);
    }

    Ok(requirement)
}

fn parse_schedule(value: &Value) -> Option<Schedule> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .filter(|&n| n > 0 && n <= u32::MAX as u64)
            .map(|n| Schedule::EveryMinutes(n as u32)),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if let Ok(minutes) = s.parse::<u32>() {
                return (minutes > 0).then_some(Schedule::EveryMinutes(minutes));
            }
            if s.contains(' ') {
                return Some(Schedule::Cron(s.to_string()));
            }
            None
        }
        Value::Object(map) => {
            if let Some(minutes) = map
                .get("interval_minutes")
                .or_else(|| map.get("intervalMinutes"))
                .and_then(Value::as_u64)
            {
                return (minutes > 0 && minutes <= u32::MAX as u64)
                    .then_some(Schedule::EveryMinutes(minutes as u32));
            }
            map.get("cron")
                .and_then(Value::as_str)
                .map(|s| Schedule::Cron(s.to_string()))
        }
        _ => None,
    }
}
