//! # Graph description parser
//!
//! Parses the textual directed-graph description produced by the automaton
//! learner into a [`StateGraph`], using the Pest parser generator.
//!
//! ## Overview
//!
//! The grammar (see `grammar.pest`) covers the subset of the description
//! language the learner emits: a `digraph` header, node statements with a
//! quoted (possibly multi-line) label, and edge statements annotated with
//! `<action>:<probability>`. Unknown attributes (shape, color) are parsed
//! and ignored.
//!
//! ## Semantics enforced here
//!
//! - Node ordering is first-seen declaration order; identical input always
//!   yields an identical graph.
//! - Duplicate edges between the same ordered pair are both retained;
//!   merging is the matrix builder's job.
//! - Every edge endpoint must be declared as a node somewhere in the
//!   input (declarations may follow the edges that use them).
//! - An edge without a parseable `<action>:<probability>` label is
//!   malformed input, as is a probability outside [0, 1].
//!
//! All failures surface as [`FrontendError::MalformedGraph`] with the
//! offending line or token.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::errors::FrontendError;
use crate::model::StateGraph;

#[derive(Parser)]
#[grammar = "../grammar.pest"]
struct DotParser;

/// Parses graph-description text into a [`StateGraph`].
///
/// Pure and deterministic: no I/O, and identical input yields an
/// identical graph with the same node ordering.
pub fn parse_dot(source: &str) -> Result<StateGraph, FrontendError> {
    let mut pairs = DotParser::parse(Rule::dot_graph, source)
        .map_err(|e| FrontendError::MalformedGraph(e.to_string()))?;

    let mut graph = StateGraph::new("model");
    let Some(root) = pairs.next() else {
        return Ok(graph);
    };
    debug_assert_eq!(root.as_rule(), Rule::dot_graph);

    let statements: Vec<Pair<Rule>> = root
        .into_inner()
        .filter(|p| !matches!(p.as_rule(), Rule::EOI))
        .collect();

    // First pass: graph name and node declarations, fixing the arena order.
    for pair in &statements {
        match pair.as_rule() {
            Rule::ident => graph.name = pair.as_str().to_string(),
            Rule::node_stmt => {
                let mut inner = pair.clone().into_inner();
                let name = match inner.next() {
                    Some(p) => p.as_str().to_string(),
                    None => continue,
                };
                let label = inner
                    .next()
                    .and_then(|attrs| attr_value(attrs, "label"))
                    .unwrap_or_default();
                graph.upsert_node(&name, &label);
            }
            _ => {}
        }
    }

    // Second pass: edges, now that every declared node is known.
    for pair in &statements {
        if pair.as_rule() != Rule::edge_stmt {
            continue;
        }
        build_edge(pair.clone(), &mut graph)?;
    }

    Ok(graph)
}

fn build_edge(pair: Pair<Rule>, graph: &mut StateGraph) -> Result<(), FrontendError> {
    let line = pair.as_span().start_pos().line_col().0;
    let mut inner = pair.into_inner();
    let (Some(src), Some(dst)) = (inner.next(), inner.next()) else {
        return Err(FrontendError::MalformedGraph(format!(
            "incomplete edge statement on line {line}"
        )));
    };
    let (src, dst) = (src.as_str(), dst.as_str());

    let source = graph.resolve(src).ok_or_else(|| {
        FrontendError::MalformedGraph(format!(
            "edge on line {line} references undeclared node '{src}'"
        ))
    })?;
    let target = graph.resolve(dst).ok_or_else(|| {
        FrontendError::MalformedGraph(format!(
            "edge on line {line} references undeclared node '{dst}'"
        ))
    })?;

    let label = inner.next().and_then(|attrs| attr_value(attrs, "label"));
    let Some(label) = label else {
        return Err(FrontendError::MalformedGraph(format!(
            "edge {src} -> {dst} on line {line} is missing its probability annotation"
        )));
    };

    // Annotation convention is "<action>:<probability>"; action names
    // never contain ':'.
    let Some((action, prob_text)) = label.rsplit_once(':') else {
        return Err(FrontendError::MalformedGraph(format!(
            "edge {src} -> {dst} on line {line} has label '{label}' without a probability"
        )));
    };
    let probability: f64 = prob_text.trim().parse().map_err(|_| {
        FrontendError::MalformedGraph(format!(
            "edge {src} -> {dst} on line {line} has non-numeric probability '{prob_text}'"
        ))
    })?;
    if !(0.0..=1.0).contains(&probability) {
        return Err(FrontendError::MalformedGraph(format!(
            "edge {src} -> {dst} on line {line} has probability {probability} outside [0, 1]"
        )));
    }

    graph.add_transition(source, target, action.trim(), probability);
    Ok(())
}

/// Extracts the value of a named attribute from an `attr_list` pair, if
/// present. Quoted values are returned without their quotes.
fn attr_value(attr_list: Pair<Rule>, wanted: &str) -> Option<String> {
    if attr_list.as_rule() != Rule::attr_list {
        return None;
    }
    for attr in attr_list.into_inner() {
        let mut parts = attr.into_inner();
        let name = parts.next()?;
        if name.as_str() != wanted {
            continue;
        }
        let value = parts.next()?;
        return Some(match value.as_rule() {
            Rule::quoted => value
                .into_inner()
                .next()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            _ => value.as_str().to_string(),
        });
    }
    None
}
