//! # Predecessor analysis
//!
//! Ranks, for each target state, the states with a direct transition into
//! it, the immediate causes of reaching the target. Self-loops are kept:
//! a target that is its own strongest predecessor is a sticky state, and
//! that is informative in itself.

use rustc_hash::FxHashMap;

use crate::engine::errors::AnalysisError;
use crate::engine::matrix::TransitionMatrix;

/// One direct predecessor of a target state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredecessorEntry {
    /// State index of the predecessor.
    pub state: usize,
    /// Transition probability from the predecessor into the target.
    pub probability: f64,
}

/// Ranked predecessor lists keyed by target state index.
pub type PredecessorMap = FxHashMap<usize, Vec<PredecessorEntry>>;

/// Ranks the direct predecessors of each target.
///
/// Every state with a strictly positive transition probability into the
/// target (and at least `threshold`) is listed, sorted by descending
/// probability with ties broken by ascending state index for
/// determinism. A target with no incoming transitions gets an empty
/// list. Pass `threshold = 0.0` for the complete ranking.
pub fn rank_predecessors(
    matrix: &TransitionMatrix,
    targets: &[usize],
    threshold: f64,
) -> Result<PredecessorMap, AnalysisError> {
    let mut ranking = PredecessorMap::default();
    for &target in targets {
        matrix.check_index(target)?;
        let mut entries: Vec<PredecessorEntry> = (0..matrix.states())
            .filter_map(|state| {
                let probability = matrix.get(state, target);
                (probability > 0.0 && probability >= threshold)
                    .then_some(PredecessorEntry { state, probability })
            })
            .collect();
        entries.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.state.cmp(&b.state))
        });
        ranking.insert(target, entries);
    }
    Ok(ranking)
}
