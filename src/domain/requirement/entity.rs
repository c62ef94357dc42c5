//! Structured requirement extracted from a natural-language request

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How the synthesized workflow is triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Schedule,
    Webhook,
    #[default]
    Manual,
}

impl TriggerKind {
    /// Map a model-emitted label to a trigger kind. Unknown labels fall
    /// back to `Manual`, consistent with the attempt-first policy.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "schedule" | "scheduled" | "cron" | "interval" | "timer" => Self::Schedule,
            "webhook" | "http" | "endpoint" => Self::Webhook,
            _ => Self::Manual,
        }
    }
}

/// A node type requested by the intent analysis.
///
/// Unknown labels are preserved as `ManualStep` placeholders rather than
/// dropped, so the graph keeps its structural completeness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    HttpCheck,
    HttpRequest,
    Condition,
    DiscordNotify,
    SlackNotify,
    EmailNotify,
    DataTransform,
    ManualStep { label: String },
}

impl NodeKind {
    /// Map a model-emitted label to a node kind
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "httpcheck" | "http_check" | "uptime" | "ping" => Self::HttpCheck,
            "httprequest" | "http_request" | "apicall" | "api_call" => Self::HttpRequest,
            "condition" | "if" | "filter" | "branch" => Self::Condition,
            "discordnotify" | "discord_notify" | "discord" => Self::DiscordNotify,
            "slacknotify" | "slack_notify" | "slack" => Self::SlackNotify,
            "emailnotify" | "email_notify" | "email" | "sendemail" => Self::EmailNotify,
            "datatransform" | "data_transform" | "transform" | "set" => Self::DataTransform,
            _ => Self::ManualStep {
                label: label.trim().to_string(),
            },
        }
    }

    /// Canonical label used for parameter key-matching
    pub fn label(&self) -> &str {
        match self {
            Self::HttpCheck => "httpCheck",
            Self::HttpRequest => "httpRequest",
            Self::Condition => "condition",
            Self::DiscordNotify => "discordNotify",
            Self::SlackNotify => "slackNotify",
            Self::EmailNotify => "emailNotify",
            Self::DataTransform => "dataTransform",
            Self::ManualStep { label } => label,
        }
    }

    pub fn is_condition(&self) -> bool {
        matches!(self, Self::Condition)
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::ManualStep { .. })
    }
}

/// Requested execution schedule for schedule-triggered workflows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schedule {
    /// Fixed interval in minutes
    EveryMinutes(u32),
    /// Cron expression, passed through to the platform
    Cron(String),
}

/// Transient structured result of intent analysis.
///
/// Not persisted on its own; a snapshot is embedded inside the outcome
/// record for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    feasible: bool,
    trigger: TriggerKind,
    node_kinds: Vec<NodeKind>,
    parameters: BTreeMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schedule: Option<Schedule>,
}

impl Requirement {
    /// Create a new requirement. `feasible` defaults to true.
    pub fn new(trigger: TriggerKind) -> Self {
        Self {
            feasible: true,
            trigger,
            node_kinds: Vec::new(),
            parameters: BTreeMap::new(),
            schedule: None,
        }
    }

    pub fn with_feasible(mut self, feasible: bool) -> Self {
        self.feasible = feasible;
        self
    }

    pub fn with_node_kinds(mut self, node_kinds: Vec<NodeKind>) -> Self {
        self.node_kinds = node_kinds;
        self
    }

    pub fn with_node_kind(mut self, kind: NodeKind) -> Self {
        self.node_kinds.push(kind);
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    pub fn with_parameters(mut self, parameters: BTreeMap<String, serde_json::Value>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    pub fn trigger(&self) -> TriggerKind {
        self.trigger
    }

    pub fn node_kinds(&self) -> &[NodeKind] {
        &self.node_kinds
    }

    pub fn parameters(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.parameters
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }
}
