//! # Graph filtering
//!
//! Reduces a parsed graph to the neighborhood of a set of target states,
//! for downstream rendering: the targets themselves plus their direct
//! predecessors and successors, and only the edges whose endpoints both
//! survive. The result is a regular [`StateGraph`], so
//! [`StateGraph::to_dot`] re-emits it in the original convention and the
//! output parses again with [`crate::parser::parse_dot`].

use crate::errors::FrontendError;
use crate::model::{NodeId, StateGraph};

/// Filters `graph` down to `targets` and their direct neighbors.
///
/// Node order in the result follows the original arena order, keeping
/// downstream index assignment deterministic. Fails with
/// [`FrontendError::UnknownTarget`] if any target name is not a state of
/// the graph.
pub fn filter_graph(graph: &StateGraph, targets: &[&str]) -> Result<StateGraph, FrontendError> {
    let mut keep = vec![false; graph.node_count()];
    for name in targets {
        let id = graph
            .resolve(name)
            .ok_or_else(|| FrontendError::UnknownTarget(name.to_string()))?;
        keep[id.index()] = true;
        for t in graph.incoming(id) {
            keep[t.source.index()] = true;
        }
        for t in graph.outgoing(id) {
            keep[t.target.index()] = true;
        }
    }

    let mut filtered = StateGraph::new(format!("filtered_{}", graph.name));
    let mut remap: Vec<Option<NodeId>> = vec![None; graph.node_count()];
    for node in graph.nodes() {
        if keep[node.id.index()] {
            remap[node.id.index()] = Some(filtered.upsert_node(&node.name, &node.label));
        }
    }
    for t in graph.transitions() {
        if let (Some(source), Some(target)) =
            (remap[t.source.index()], remap[t.target.index()])
        {
            filtered.add_transition(source, target, &t.action, t.probability);
        }
    }
    Ok(filtered)
}
