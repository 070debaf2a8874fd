//! # Reachability analysis
//!
//! Step-wise and cumulative hitting-probability series over a bounded
//! horizon, computed by iterative row-vector multiplication against the
//! transition matrix.
//!
//! ## Step-wise vs cumulative
//!
//! The step-wise series reports the probability of being *exactly* at a
//! target after exactly t steps: `v_t = e_source · M^t`, read off at the
//! target's index. A revisitable target's value can fall and rise again
//! over time.
//!
//! The cumulative series reports the probability of having occupied a
//! target at least once by step t. Each target gets its own pass in which
//! only that target absorbs: mass entering it is banked and removed from
//! the active distribution, so the series is monotone non-decreasing and
//! bounded by 1 regardless of which other targets the query names. Mass
//! that reaches a *different* target keeps flowing.
//!
//! Both series have length `steps + 1`, index 0 being the initial
//! distribution (probability 1.0 at the source). Queries share no mutable
//! state, so distinct (source, targets, horizon) combinations can run in
//! parallel against the same matrix; with the `rayon` feature the
//! per-target cumulative passes themselves are parallel.

use rustc_hash::FxHashMap;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::engine::errors::AnalysisError;
use crate::engine::matrix::TransitionMatrix;

/// Per-target probability series keyed by target state index. Each series
/// has one entry per step, index 0 = step 0.
pub type SeriesMap = FxHashMap<usize, Vec<f64>>;

fn one_hot(n: usize, index: usize) -> Vec<f64> {
    let mut dist = vec![0.0; n];
    dist[index] = 1.0;
    dist
}

fn check_query(
    matrix: &TransitionMatrix,
    source: usize,
    targets: &[usize],
) -> Result<(), AnalysisError> {
    matrix.check_index(source)?;
    for &t in targets {
        matrix.check_index(t)?;
    }
    Ok(())
}

/// Probability of occupying each target at exactly step t, for
/// t = 0..=steps.
///
/// One shared pass: the full occupation distribution is advanced step by
/// step and sampled at every target.
pub fn step_series(
    matrix: &TransitionMatrix,
    source: usize,
    targets: &[usize],
    steps: usize,
) -> Result<SeriesMap, AnalysisError> {
    check_query(matrix, source, targets)?;

    let mut series: SeriesMap = targets
        .iter()
        .map(|&t| (t, Vec::with_capacity(steps + 1)))
        .collect();

    let mut dist = one_hot(matrix.states(), source);
    for (&t, s) in series.iter_mut() {
        s.push(dist[t]);
    }
    for _ in 1..=steps {
        dist = matrix.propagate(&dist);
        for (&t, s) in series.iter_mut() {
            s.push(dist[t]);
        }
    }
    Ok(series)
}

/// Probability of having occupied each target at least once by step t,
/// for t = 0..=steps.
///
/// Per-target first-passage accumulation; see the module docs for why
/// each target absorbs independently.
pub fn cumulative_series(
    matrix: &TransitionMatrix,
    source: usize,
    targets: &[usize],
    steps: usize,
) -> Result<SeriesMap, AnalysisError> {
    check_query(matrix, source, targets)?;

    #[cfg(feature = "rayon")]
    let series: SeriesMap = targets
        .par_iter()
        .map(|&t| (t, cumulative_for_target(matrix, source, t, steps)))
        .collect::<Vec<_>>()
        .into_iter()
        .collect();

    #[cfg(not(feature = "rayon"))]
    let series: SeriesMap = targets
        .iter()
        .map(|&t| (t, cumulative_for_target(matrix, source, t, steps)))
        .collect();

    Ok(series)
}

fn cumulative_for_target(
    matrix: &TransitionMatrix,
    source: usize,
    target: usize,
    steps: usize,
) -> Vec<f64> {
    let mut series = Vec::with_capacity(steps + 1);
    let mut active = one_hot(matrix.states(), source);

    // Mass starting on the target counts as arrived at step 0 and is
    // removed from the active distribution, keeping the series <= 1.
    let mut arrived = active[target];
    active[target] = 0.0;
    series.push(arrived);

    for _ in 1..=steps {
        let mut next = matrix.propagate(&active);
        arrived += next[target];
        next[target] = 0.0;
        active = next;
        series.push(arrived);
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use markant_frontend::parse_dot;

    fn matrix(src: &str) -> TransitionMatrix {
        TransitionMatrix::from_graph(&parse_dot(src).expect("parse")).expect("build")
    }

    fn chain() -> TransitionMatrix {
        matrix(
            r#"digraph m {
                s0 [label=""];
                s1 [label=""];
                s2 [label=""];
                s0 -> s0 [label="run:0.3"];
                s0 -> s1 [label="run:0.7"];
                s1 -> s2 [label="run:1.0"];
            }"#,
        )
    }

    #[test]
    fn step_zero_is_the_initial_distribution() {
        let m = chain();
        let series = step_series(&m, 0, &[0, 1, 2], 0).expect("series");
        assert_eq!(series[&0], vec![1.0]);
        assert_eq!(series[&1], vec![0.0]);
        assert_eq!(series[&2], vec![0.0]);
    }

    #[test]
    fn stepwise_reaches_absorbing_state() {
        let m = chain();
        let series = step_series(&m, 0, &[2], 2).expect("series");
        assert!((series[&2][2] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn cumulative_matches_stepwise_for_absorbing_target() {
        let m = chain();
        let step = step_series(&m, 0, &[2], 2).expect("step");
        let cum = cumulative_series(&m, 0, &[2], 2).expect("cum");
        for t in 0..=2 {
            assert!((step[&2][t] - cum[&2][t]).abs() < 1e-12);
        }
    }

    #[test]
    fn cumulative_counts_first_passage_through_revisitable_state() {
        // s1 is left again with certainty, so its step-wise value decays
        // while its cumulative value only grows.
        let m = chain();
        let cum = cumulative_series(&m, 0, &[1], 4).expect("cum");
        let s = &cum[&1];
        for t in 1..s.len() {
            assert!(s[t] >= s[t - 1]);
        }
        // 1 - 0.3^t mass has passed through s1 by step t.
        assert!((s[4] - (1.0 - 0.3f64.powi(4))).abs() < 1e-12);
    }

    #[test]
    fn source_equals_target_is_certain_from_step_zero() {
        let m = chain();
        let cum = cumulative_series(&m, 0, &[0], 3).expect("cum");
        assert_eq!(cum[&0], vec![1.0; 4]);
        let step = step_series(&m, 0, &[0], 0).expect("step");
        assert_eq!(step[&0], vec![1.0]);
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let m = chain();
        assert!(matches!(
            step_series(&m, 9, &[0], 1),
            Err(AnalysisError::IndexOutOfRange { index: 9, .. })
        ));
        assert!(matches!(
            cumulative_series(&m, 0, &[7], 1),
            Err(AnalysisError::IndexOutOfRange { index: 7, .. })
        ));
    }
}
