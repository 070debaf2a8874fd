//! # Transition matrix construction
//!
//! Converts a parsed [`StateGraph`] into a dense, row-indexed transition
//! probability matrix. Row and column `i` correspond to the state with
//! arena index `i`, so the parser's first-seen ordering is the addressing
//! scheme for every downstream analysis.
//!
//! ## Absorbing-row policy
//!
//! A state with no outgoing transitions is given self-probability 1.0.
//! This is an explicit modeling decision, not an implementation detail:
//! repeated matrix-vector multiplication is only well-defined when every
//! row is a distribution, and a zero row would silently leak probability
//! mass out of the chain. It changes the reading of "terminal" states:
//! they hold their mass forever rather than dropping it.

use markant_frontend::{NodeId, StateGraph};

use crate::engine::errors::AnalysisError;

/// Maximum deviation of a row sum from 1.0 before the row is rejected as
/// non-stochastic.
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Dense row-major transition probability matrix over the graph's state
/// arena. Immutable after construction; concurrent read-only queries need
/// no coordination.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionMatrix {
    n: usize,
    rows: Vec<f64>,
}

impl TransitionMatrix {
    /// Builds the matrix from a parsed graph.
    ///
    /// Probabilities of parallel edges (same ordered pair, distinct
    /// actions) are summed, then the absorbing-row policy is applied, and
    /// finally every row is validated against
    /// [`ROW_SUM_TOLERANCE`]. A failing row aborts with
    /// [`AnalysisError::NonStochasticRow`].
    pub fn from_graph(graph: &StateGraph) -> Result<Self, AnalysisError> {
        let n = graph.node_count();
        let mut rows = vec![0.0; n * n];

        for t in graph.transitions() {
            // Sum, not overwrite: multiple actions may lead to the same
            // next state.
            rows[t.source.index() * n + t.target.index()] += t.probability;
        }

        for i in 0..n {
            let row = &mut rows[i * n..(i + 1) * n];
            // The absorbing convention applies only to states with no
            // outgoing edges; a state whose declared edges sum to zero is
            // a data-quality failure like any other bad row.
            if graph.outgoing(NodeId(i as u32)).next().is_none() {
                row[i] = 1.0;
                continue;
            }
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(AnalysisError::NonStochasticRow { row: i, sum });
            }
        }

        Ok(TransitionMatrix { n, rows })
    }

    /// Number of states (rows and columns).
    pub fn states(&self) -> usize {
        self.n
    }

    /// Transition probability from state `i` to state `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.rows[i * self.n + j]
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.rows[i * self.n..(i + 1) * self.n]
    }

    /// One step of the chain: computes `dist · M` for a row vector.
    ///
    /// Scalar reference kernel; O(n²) per step, so a horizon of k steps
    /// costs O(k·n²).
    pub fn propagate(&self, dist: &[f64]) -> Vec<f64> {
        debug_assert_eq!(dist.len(), self.n);
        let mut next = vec![0.0; self.n];
        for (i, &mass) in dist.iter().enumerate() {
            if mass == 0.0 {
                continue;
            }
            for (j, &p) in self.row(i).iter().enumerate() {
                next[j] += mass * p;
            }
        }
        next
    }

    /// Validates that `index` addresses a state of this matrix.
    pub fn check_index(&self, index: usize) -> Result<(), AnalysisError> {
        if index >= self.n {
            return Err(AnalysisError::IndexOutOfRange {
                index,
                states: self.n,
            });
        }
        Ok(())
    }
}
