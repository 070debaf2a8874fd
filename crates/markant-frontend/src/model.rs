//! # State graph model
//!
//! In-memory representation of a learned stochastic automaton: an arena of
//! states addressed by dense [`NodeId`] indexes plus a flat list of
//! labeled, probability-weighted transitions.
//!
//! ## Design
//!
//! - States live in a `Vec` in first-seen order; `NodeId(u32)` is the
//!   index into that arena. This ordering is the addressing scheme for
//!   the transition matrix and everything downstream, so it is assigned
//!   once at parse time and never reshuffled.
//! - Transitions are kept as parsed: duplicate edges between the same
//!   ordered pair (distinct actions) are retained here and only merged
//!   when the matrix is built.
//! - O(1) name lookup via an `FxHashMap` index; per-node in/out adjacency
//!   as `SmallVec`s of transition indexes, since learned automata have
//!   small out-degrees.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// A unique identifier for a state in the graph.
///
/// Dense index in first-seen order. Implements `Ord` for stable,
/// deterministic iteration.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    /// The arena index of this state.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A state of the learned automaton.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateNode {
    pub id: NodeId,
    /// Name as written in the description text (e.g. `s12`).
    pub name: String,
    /// Raw label text; may embed structured `{key:value, ...}` fields.
    pub label: String,
}

/// A directed, probability-weighted transition between two states.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub source: NodeId,
    pub target: NodeId,
    /// Action name from the edge annotation (e.g. `run`).
    pub action: String,
    pub probability: f64,
}

/// A learned automaton: state arena plus transition list.
///
/// Immutable once parsed; analyses only read it.
#[derive(Debug, Clone, Default)]
pub struct StateGraph {
    /// Graph name from the `digraph` header.
    pub name: String,
    nodes: Vec<StateNode>,
    transitions: Vec<Transition>,
    by_name: FxHashMap<String, NodeId>,
    outgoing: Vec<SmallVec<[u32; 4]>>,
    incoming: Vec<SmallVec<[u32; 4]>>,
}

impl StateGraph {
    pub fn new(name: impl Into<String>) -> Self {
        StateGraph {
            name: name.into(),
            ..StateGraph::default()
        }
    }

    /// Inserts a state, or updates the label of an existing one.
    ///
    /// First insertion fixes the state's position in the arena; a repeated
    /// declaration only refreshes the label.
    pub fn upsert_node(&mut self, name: &str, label: &str) -> NodeId {
        if let Some(&id) = self.by_name.get(name) {
            if !label.is_empty() {
                self.nodes[id.index()].label = label.to_string();
            }
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(StateNode {
            id,
            name: name.to_string(),
            label: label.to_string(),
        });
        self.by_name.insert(name.to_string(), id);
        self.outgoing.push(SmallVec::new());
        self.incoming.push(SmallVec::new());
        id
    }

    /// Appends a transition. Endpoints must already exist in the arena;
    /// the parser guarantees this before calling.
    pub fn add_transition(&mut self, source: NodeId, target: NodeId, action: &str, probability: f64) {
        let idx = self.transitions.len() as u32;
        self.transitions.push(Transition {
            source,
            target,
            action: action.to_string(),
            probability,
        });
        self.outgoing[source.index()].push(idx);
        self.incoming[target.index()].push(idx);
    }

    /// Looks up a state by its textual name.
    pub fn resolve(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn node(&self, id: NodeId) -> &StateNode {
        &self.nodes[id.index()]
    }

    pub fn nodes(&self) -> &[StateNode] {
        &self.nodes
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Transitions leaving `id`, in input order.
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &Transition> {
        self.outgoing[id.index()]
            .iter()
            .map(move |&i| &self.transitions[i as usize])
    }

    /// Transitions entering `id`, in input order.
    pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = &Transition> {
        self.incoming[id.index()]
            .iter()
            .map(move |&i| &self.transitions[i as usize])
    }

    /// Re-serializes the graph in the same textual convention it was
    /// parsed from, so the output is parseable again and usable by the
    /// external renderer.
    ///
    /// Nodes are emitted in arena order, then transitions in input order,
    /// making serialization deterministic.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("digraph {} {{\n", self.name));
        for node in &self.nodes {
            out.push_str(&format!("{} [label=\"{}\"];\n", node.name, node.label));
        }
        for t in &self.transitions {
            out.push_str(&format!(
                "{} -> {} [label=\"{}:{}\"];\n",
                self.nodes[t.source.index()].name,
                self.nodes[t.target.index()].name,
                t.action,
                t.probability,
            ));
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_keeps_first_seen_order() {
        let mut g = StateGraph::new("m");
        let a = g.upsert_node("s0", "zero");
        let b = g.upsert_node("s1", "one");
        let a2 = g.upsert_node("s0", "zero again");
        assert_eq!(a, a2);
        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));
        assert_eq!(g.node(a).label, "zero again");
    }

    #[test]
    fn adjacency_tracks_transitions() {
        let mut g = StateGraph::new("m");
        let a = g.upsert_node("s0", "");
        let b = g.upsert_node("s1", "");
        g.add_transition(a, b, "run", 0.4);
        g.add_transition(a, a, "run", 0.6);
        assert_eq!(g.outgoing(a).count(), 2);
        assert_eq!(g.incoming(b).count(), 1);
        assert_eq!(g.incoming(a).count(), 1);
    }
}
