//! Text export of derived artifacts.
//!
//! Renders the transition matrix and the completion-state label map in
//! the line-oriented formats the downstream tooling consumes. Writers
//! return strings; file I/O stays with the caller (the CLI).

use rustc_hash::FxHashMap;

use markant_frontend::{NodeId, StateGraph};

use crate::engine::matrix::TransitionMatrix;

/// Renders the matrix as delimited text: a header row of node names in
/// matrix order, then one `name,p0,p1,...` row per state.
pub fn matrix_csv(matrix: &TransitionMatrix, graph: &StateGraph) -> String {
    let names: Vec<&str> = graph.nodes().iter().map(|n| n.name.as_str()).collect();
    let mut out = String::new();
    out.push(',');
    out.push_str(&names.join(","));
    out.push('\n');
    for (i, name) in names.iter().enumerate() {
        out.push_str(name);
        for p in matrix.row(i) {
            out.push(',');
            out.push_str(&p.to_string());
        }
        out.push('\n');
    }
    out
}

/// Renders the completion-state label map as one `name: description` line
/// per state, in arena order.
pub fn label_lines(graph: &StateGraph, labels: &FxHashMap<NodeId, String>) -> String {
    let mut out = String::new();
    for node in graph.nodes() {
        if let Some(description) = labels.get(&node.id) {
            out.push_str(&format!("{}: {}\n", node.name, description));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use markant_frontend::{completion_labels, parse_dot};

    #[test]
    fn csv_has_name_headers_and_square_body() {
        let g = parse_dot(
            r#"digraph m {
                s0 [label=""];
                s1 [label=""];
                s0 -> s1 [label="run:1.0"];
            }"#,
        )
        .expect("parse");
        let m = TransitionMatrix::from_graph(&g).expect("build");
        let csv = matrix_csv(&m, &g);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], ",s0,s1");
        assert_eq!(lines[1], "s0,0,1");
        assert_eq!(lines[2], "s1,0,1");
    }

    #[test]
    fn label_lines_follow_arena_order() {
        let g = parse_dot(
            r#"digraph m {
                s0 [label="start"];
                s1 [label="Completed False high"];
                s2 [label="Completed True low"];
                s0 -> s1 [label="run:0.5"];
                s0 -> s2 [label="run:0.5"];
            }"#,
        )
        .expect("parse");
        let labels = completion_labels(&g);
        let text = label_lines(&g, &labels);
        assert_eq!(text, "s1: Late High Priority\ns2: On Time Low Priority\n");
    }
}
