//! Property tests for the numeric invariants of the analysis engine:
//! stochastic rows, conservation of probability mass, and monotone
//! cumulative series.

use markant_core::{cumulative_series, step_series, TransitionMatrix, ROW_SUM_TOLERANCE};
use markant_frontend::StateGraph;
use proptest::prelude::*;

/// Builds a graph whose rows are normalized random weights. Rows drawn
/// all-zero are left without outgoing transitions, exercising the
/// absorbing convention.
fn graph_from_weights(weights: Vec<Vec<f64>>) -> StateGraph {
    let n = weights.len();
    let mut g = StateGraph::new("generated");
    let ids: Vec<_> = (0..n)
        .map(|i| g.upsert_node(&format!("s{i}"), ""))
        .collect();
    for (i, row) in weights.iter().enumerate() {
        let total: f64 = row.iter().sum();
        if total == 0.0 {
            continue;
        }
        for (j, &w) in row.iter().enumerate() {
            if w > 0.0 {
                g.add_transition(ids[i], ids[j], "run", w / total);
            }
        }
    }
    g
}

fn query() -> impl Strategy<Value = (StateGraph, usize, usize, usize)> {
    (2usize..8).prop_flat_map(|n| {
        (
            proptest::collection::vec(proptest::collection::vec(0.0f64..1.0, n), n),
            0..n,
            0..n,
            0usize..30,
        )
            .prop_map(|(weights, source, target, steps)| {
                (graph_from_weights(weights), source, target, steps)
            })
    })
}

proptest! {
    #[test]
    fn rows_sum_to_one((graph, _, _, _) in query()) {
        let matrix = TransitionMatrix::from_graph(&graph).expect("build");
        for i in 0..matrix.states() {
            let sum: f64 = matrix.row(i).iter().sum();
            prop_assert!((sum - 1.0).abs() <= ROW_SUM_TOLERANCE, "row {} sums to {}", i, sum);
        }
    }

    #[test]
    fn mass_is_conserved_across_steps((graph, source, _, steps) in query()) {
        let matrix = TransitionMatrix::from_graph(&graph).expect("build");
        let mut dist = vec![0.0; matrix.states()];
        dist[source] = 1.0;
        for _ in 0..steps {
            dist = matrix.propagate(&dist);
            let sum: f64 = dist.iter().sum();
            prop_assert!((sum - 1.0).abs() <= 1e-6, "mass {}", sum);
            prop_assert!(dist.iter().all(|&p| (0.0..=1.0 + 1e-9).contains(&p)));
        }
    }

    #[test]
    fn stepwise_starts_at_the_initial_distribution((graph, source, target, _) in query()) {
        let matrix = TransitionMatrix::from_graph(&graph).expect("build");
        let series = step_series(&matrix, source, &[target], 0).expect("series");
        let expected = if source == target { 1.0 } else { 0.0 };
        prop_assert_eq!(series[&target][0], expected);
    }

    #[test]
    fn cumulative_is_monotone_and_bounded((graph, source, target, steps) in query()) {
        let matrix = TransitionMatrix::from_graph(&graph).expect("build");
        let series = cumulative_series(&matrix, source, &[target], steps).expect("series");
        let s = &series[&target];
        prop_assert_eq!(s.len(), steps + 1);
        for t in 1..s.len() {
            prop_assert!(s[t] + 1e-12 >= s[t - 1], "dropped at step {}", t);
        }
        prop_assert!(s[steps] <= 1.0 + 1e-9);
    }

    #[test]
    fn cumulative_dominates_stepwise((graph, source, target, steps) in query()) {
        // Having been at the target by step t is at least as likely as
        // being there exactly at step t.
        let matrix = TransitionMatrix::from_graph(&graph).expect("build");
        let step = step_series(&matrix, source, &[target], steps).expect("step");
        let cum = cumulative_series(&matrix, source, &[target], steps).expect("cum");
        for t in 0..=steps {
            prop_assert!(cum[&target][t] + 1e-9 >= step[&target][t], "step {}", t);
        }
    }
}
