//! Workflow graph entity

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Identifier of a node, unique within its graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node id. Ids are machine-generated by the builder;
    /// only emptiness is rejected here.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::validation("Node ID cannot be empty"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural role of a node within the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeClass {
    Trigger,
    Action,
    Condition,
    Notification,
}

/// Canvas position, used by the platform's editor UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A typed node in a workflow graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,

    /// Platform-facing kind label, e.g. "scheduleTrigger" or "httpCheck"
    kind: String,

    class: NodeClass,

    #[serde(default)]
    parameters: BTreeMap<String, serde_json::Value>,

    position: Position,
}

impl Node {
    pub fn new(id: NodeId, kind: impl Into<String>, class: NodeClass, position: Position) -> Self {
        Self {
            id,
            kind: kind.into(),
            class,
            parameters: BTreeMap::new(),
            position,
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn class(&self) -> NodeClass {
        self.class
    }

    pub fn parameters(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.parameters
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_trigger(&self) -> bool {
        self.class == NodeClass::Trigger
    }

    pub(crate) fn set_parameter(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.parameters.insert(key.into(), value);
    }
}

/// Compact description of a graph, returned to synthesis callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSummary {
    pub node_count: usize,
    pub node_kinds: Vec<String>,
    pub connection_count: usize,
}

/// The synthesized workflow artifact: typed nodes plus a connection map
/// expressing execution order.
///
/// Connection targets are ordered; for condition nodes the target index
/// is the output port (true branch first, then false).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowGraph {
    nodes: Vec<Node>,
    connections: BTreeMap<NodeId, Vec<NodeId>>,
}

impl WorkflowGraph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            connections: BTreeMap::new(),
        }
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Append a connection from `source` to `target`
    pub fn connect(&mut self, source: NodeId, target: NodeId) {
        self.connections.entry(source).or_default().push(target);
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn connections(&self) -> &BTreeMap<NodeId, Vec<NodeId>> {
        &self.connections
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    /// The single trigger node, if the graph has exactly one
    pub fn trigger(&self) -> Option<&Node> {
        let mut triggers = self.nodes.iter().filter(|n| n.is_trigger());
        let first = triggers.next()?;
        if triggers.next().is_some() {
            return None;
        }
        Some(first)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            node_count: self.nodes.len(),
            node_kinds: self.nodes.iter().map(|n| n.kind().to_string()).collect(),
            connection_count: self.connections.values().map(Vec::len).sum(),
        }
    }
}

impl Default for WorkflowGraph {
    fn default() -> Self {
        Self::new()
    }
}
