//! Workflow graph builder
//!
//! Pure, deterministic compilation of a requirement into a graph. No
//! side effects, no I/O: the same requirement always yields the same
//! graph, byte for byte.

use serde_json::json;

use crate::domain::graph::{validate, Node, NodeClass, NodeId, Position, WorkflowGraph};
use crate::domain::{DomainError, NodeKind, Requirement, Schedule, TriggerKind};

/// Canvas grid used for node placement
const GRID_X_START: i32 = 250;
const GRID_X_STEP: i32 = 220;
const GRID_Y: i32 = 300;

/// Compiles requirements into validated workflow graphs
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a graph: one trigger, one node per requested kind, linear
    /// chain connections with condition nodes wiring both branch ports
    /// to the next node.
    pub fn build(&self, requirement: &Requirement) -> Result<WorkflowGraph, DomainError> {
        let mut graph = WorkflowGraph::new();

        let trigger = self.trigger_node(requirement)?;
        let trigger_id = trigger.id().clone();
        graph.add_node(trigger);

        let mut previous = trigger_id;
        for (index, kind) in requirement.node_kinds().iter().enumerate() {
            let node = self.step_node(index, kind)?;
            let id = node.id().clone();
            graph.add_node(node);

            // Wire the previous node forward. A condition node later gets
            // both its ports wired when we see its successor.
            let previous_is_condition = graph
                .node(&previous)
                .map(|n| n.class() == NodeClass::Condition)
                .unwrap_or(false);

            graph.connect(previous.clone(), id.clone());
            if previous_is_condition {
                // Second entry is the false-branch port, merging forward.
                graph.connect(previous.clone(), id.clone());
            }

            previous = id;
        }

        self.assign_parameters(&mut graph, requirement);

        validate(&graph)?;
        Ok(graph)
    }

    fn trigger_node(&self, requirement: &Requirement) -> Result<Node, DomainError> {
        let id = NodeId::new("trigger")?;
        let position = Position::new(GRID_X_START, GRID_Y);

        let node = match requirement.trigger() {
            TriggerKind::Schedule => {
                let node = Node::new(id, "scheduleTrigger", NodeClass::Trigger, position);
                match requirement.schedule() {
                    Some(Schedule::EveryMinutes(minutes)) => {
                        node.with_parameter("interval_minutes", json!(minutes))
                    }
                    Some(Schedule::Cron(expression)) => {
                        node.with_parameter("cron", json!(expression))
                    }
                    None => node,
                }
            }
            TriggerKind::Webhook => Node::new(id, "webhookTrigger", NodeClass::Trigger, position)
                .with_parameter("path", json!("incoming")),
            TriggerKind::Manual => Node::new(id, "manualTrigger", NodeClass::Trigger, position),
        };

        Ok(node)
    }

    fn step_node(&self, index: usize, kind: &NodeKind) -> Result<Node, DomainError> {
        let id = NodeId::new(format!("node-{}", index + 1))?;
        let position = Position::new(GRID_X_START + GRID_X_STEP * (index as i32 + 1), GRID_Y);

        let (kind_label, class) = match kind {
            NodeKind::Condition => ("condition", NodeClass::Condition),
            NodeKind::DiscordNotify => ("discordNotify", NodeClass::Notification),
            NodeKind::SlackNotify => ("slackNotify", NodeClass::Notification),
            NodeKind::EmailNotify => ("emailNotify", NodeClass::Notification),
            NodeKind::HttpCheck => ("httpCheck", NodeClass::Action),
            NodeKind::HttpRequest => ("httpRequest", NodeClass::Action),
            NodeKind::DataTransform => ("dataTransform", NodeClass::Action),
            NodeKind::ManualStep { .. } => ("manualStep", NodeClass::Action),
        };

        let mut node = Node::new(id, kind_label, class, position);
        if let NodeKind::ManualStep { label } = kind {
            node = node.with_parameter("originalKind", json!(label));
        }

        Ok(node)
    }

    /// Distribute requirement parameters across nodes by key-matching on
    /// node kind ("httpCheck.url" configures the first httpCheck node).
    /// Unmatched parameters attach to the nearest preceding node, i.e.
    /// the end of the chain, as auxiliary config.
    fn assign_parameters(&self, graph: &mut WorkflowGraph, requirement: &Requirement) {
        // The trigger is always present, so there is always a last node.
        let last_id = match graph.nodes().last() {
            Some(node) => node.id().clone(),
            None => return,
        };

        for (key, value) in requirement.parameters() {
            let target = key.split_once('.').and_then(|(kind, param)| {
                graph
                    .nodes()
                    .iter()
                    .find(|n| n.kind() == kind)
                    .map(|n| (n.id().clone(), param.to_string()))
            });

            match target {
                Some((id, param)) => {
                    if let Some(node) = graph.node_mut(&id) {
                        node.set_parameter(param, value.clone());
                    }
                }
                None => {
                    if let Some(node) = graph.node_mut(&last_id) {
                        node.set_parameter(format!("aux.{}", key), value.clone());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scenario_a_requirement() -> Requirement {
        Requirement::new(TriggerKind::Schedule)
            .with_node_kind(NodeKind::HttpCheck)
            .with_node_kind(NodeKind::Condition)
            .with_node_kind(NodeKind::DiscordNotify)
            .with_parameter("httpCheck.url", json!("https://google.com"))
            .with_parameter(
                "discordNotify.webhook",
                json!("https://discord.com/api/webhooks/1"),
            )
            .with_schedule(Schedule::EveryMinutes(5))
    }

    #[test]
    fn test_scenario_a_uptime_check() {
        let graph = GraphBuilder::new().build(&scenario_a_requirement()).unwrap();

        // Trigger + three step nodes in a single connected chain
        assert_eq!(graph.node_count(), 4);

        let trigger = graph.trigger().unwrap();
        assert_eq!(trigger.kind(), "scheduleTrigger");
        assert_eq!(trigger.parameters()["interval_minutes"], json!(5));

        let kinds: Vec<_> = graph.nodes().iter().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec!["scheduleTrigger", "httpCheck", "condition", "discordNotify"]
        );

        // Condition node branches to the notifier on both ports
        let condition_id = NodeId::new("node-2").unwrap();
        let targets = &graph.connections()[&condition_id];
        assert_eq!(targets.len(), 2);
        assert!(targets.iter().all(|t| t.as_str() == "node-3"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let requirement = scenario_a_requirement();
        let builder = GraphBuilder::new();

        let first = serde_json::to_value(builder.build(&requirement).unwrap()).unwrap();
        let second = serde_json::to_value(builder.build(&requirement).unwrap()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_parameters_key_match_by_kind() {
        let graph = GraphBuilder::new().build(&scenario_a_requirement()).unwrap();

        let check = graph.node(&NodeId::new("node-1").unwrap()).unwrap();
        assert_eq!(check.parameters()["url"], json!("https://google.com"));

        let notify = graph.node(&NodeId::new("node-3").unwrap()).unwrap();
        assert_eq!(
            notify.parameters()["webhook"],
            json!("https://discord.com/api/webhooks/1")
        );
    }

    #[test]
    fn test_unmatched_parameters_attach_as_aux() {
        let requirement = Requirement::new(TriggerKind::Manual)
            .with_node_kind(NodeKind::HttpRequest)
            .with_parameter("retries", json!(3))
            .with_parameter("emailNotify.to", json!("ops@example.com"));

        let graph = GraphBuilder::new().build(&requirement).unwrap();

        let last = graph.node(&NodeId::new("node-1").unwrap()).unwrap();
        assert_eq!(last.parameters()["aux.retries"], json!(3));
        // No emailNotify node exists, so that key lands as aux too
        assert_eq!(
            last.parameters()["aux.emailNotify.to"],
            json!("ops@example.com")
        );
    }

    #[test]
    fn test_webhook_trigger() {
        let requirement =
            Requirement::new(TriggerKind::Webhook).with_node_kind(NodeKind::SlackNotify);

        let graph = GraphBuilder::new().build(&requirement).unwrap();

        let trigger = graph.trigger().unwrap();
        assert_eq!(trigger.kind(), "webhookTrigger");
        assert_eq!(trigger.parameters()["path"], json!("incoming"));
    }

    #[test]
    fn test_manual_trigger_alone_is_valid() {
        let graph = GraphBuilder::new()
            .build(&Requirement::new(TriggerKind::Manual))
            .unwrap();

        assert_eq!(graph.node_count(), 1);
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn test_cron_schedule() {
        let requirement = Requirement::new(TriggerKind::Schedule)
            .with_schedule(Schedule::Cron("0 9 * * 1".into()));

        let graph = GraphBuilder::new().build(&requirement).unwrap();

        assert_eq!(
            graph.trigger().unwrap().parameters()["cron"],
            json!("0 9 * * 1")
        );
    }

    #[test]
    fn test_placeholder_node_preserves_original_kind() {
        let requirement = Requirement::new(TriggerKind::Manual).with_node_kind(
            NodeKind::ManualStep {
                label: "summonIntern".into(),
            },
        );

        let graph = GraphBuilder::new().build(&requirement).unwrap();

        let step = graph.node(&NodeId::new("node-1").unwrap()).unwrap();
        assert_eq!(step.kind(), "manualStep");
        assert_eq!(step.parameters()["originalKind"], json!("summonIntern"));
    }

    #[test]
    fn test_positions_follow_grid() {
        let graph = GraphBuilder::new().build(&scenario_a_requirement()).unwrap();

        let xs: Vec<_> = graph.nodes().iter().map(|n| n.position().x).collect();
        assert_eq!(xs, vec![250, 470, 690, 910]);
        assert!(graph.nodes().iter().all(|n| n.position().y == GRID_Y));
    }

    #[test]
    fn test_all_built_graphs_validate() {
        let requirements = vec![
            Requirement::new(TriggerKind::Manual),
            Requirement::new(TriggerKind::Webhook).with_node_kind(NodeKind::Condition),
            Requirement::new(TriggerKind::Schedule)
                .with_node_kind(NodeKind::Condition)
                .with_node_kind(NodeKind::Condition)
                .with_node_kind(NodeKind::EmailNotify),
        ];

        for requirement in requirements {
            let graph = GraphBuilder::new().build(&requirement).unwrap();
            assert!(validate(&graph).is_ok());
        }
    }
}
