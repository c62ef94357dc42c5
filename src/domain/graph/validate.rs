//! Structural invariant checks for workflow graphs
//!
//! Invariants: exactly one trigger node; every referenced id exists;
//! the connection relation is acyclic; every non-trigger node is
//! reachable from the trigger.

use std::collections::{BTreeSet, VecDeque};

use super::entity::{NodeId, WorkflowGraph};
use crate::domain::DomainError;

/// Validate all structural invariants, failing on the first violation
pub fn validate(graph: &WorkflowGraph) -> Result<(), DomainError> {
    let trigger_count = graph.nodes().iter().filter(|n| n.is_trigger()).count();
    if trigger_count != 1 {
        return Err(DomainError::graph_validation(format!(
            "graph must have exactly one trigger node, found {}",
            trigger_count
        )));
    }

    let ids: BTreeSet<&NodeId> = graph.nodes().iter().map(|n| n.id()).collect();
    if ids.len() != graph.node_count() {
        return Err(DomainError::graph_validation(
            "node ids must be unique within the graph",
        ));
    }

    for (source, targets) in graph.connections() {
        if !ids.contains(source) {
            return Err(DomainError::graph_validation(format!(
                "connection source '{}' does not exist",
                source
            )));
        }
        for target in targets {
            if !ids.contains(target) {
                return Err(DomainError::graph_validation(format!(
                    "connection target '{}' does not exist",
                    target
                )));
            }
        }
    }

    if has_cycle(graph) {
        return Err(DomainError::graph_validation(
            "connection relation contains a cycle",
        ));
    }

    // Reachability from the trigger. trigger() is Some: count checked above.
    let trigger = graph
        .trigger()
        .ok_or_else(|| DomainError::graph_validation("trigger node missing"))?;
    let reachable = reachable_from(graph, trigger.id());
    for node in graph.nodes() {
        if !node.is_trigger() && !reachable.contains(node.id()) {
            return Err(DomainError::graph_validation(format!(
                "node '{}' is not reachable from the trigger",
                node.id()
            )));
        }
    }

    Ok(())
}

fn reachable_from(graph: &WorkflowGraph, start: &NodeId) -> BTreeSet<NodeId> {
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::from([start.clone()]);

    while let Some(id) = queue.pop_front() {
        if let Some(targets) = graph.connections().get(&id) {
            for target in targets {
                if seen.insert(target.clone()) {
                    queue.push_back(target.clone());
                }
            }
        }
    }

    seen
}

fn has_cycle(graph: &WorkflowGraph) -> bool {
    // Iterative DFS with white/grey/black coloring. Duplicate edges
    // (condition branch ports) are deduplicated per visit.
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Grey,
        Black,
    }

    let ids: Vec<NodeId> = graph.nodes().iter().map(|n| n.id().clone()).collect();
    let mut colors: std::collections::BTreeMap<NodeId, Color> =
        ids.iter().map(|id| (id.clone(), Color::White)).collect();

    for root in &ids {
        if colors[root] != Color::White {
            continue;
        }

        let mut stack = vec![(root.clone(), false)];
        while let Some((id, processed)) = stack.pop() {
            if processed {
                colors.insert(id, Color::Black);
                continue;
            }
            match colors[&id] {
                Color::Black => continue,
                Color::Grey => continue,
                Color::White => {}
            }
            colors.insert(id.clone(), Color::Grey);
            stack.push((id.clone(), true));

            if let Some(targets) = graph.connections().get(&id) {
                let unique: BTreeSet<&NodeId> = targets.iter().collect();
                for target in unique {
                    match colors.get(target) {
                        Some(Color::Grey) => return true,
                        Some(Color::White) => stack.push(((*target).clone(), false)),
                        _ => {}
                    }
                }
            }
        }
    }

    false
}
