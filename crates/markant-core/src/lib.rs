//! # Markant Core
//!
//! Reachability analysis engine for learned stochastic automata: builds a
//! transition probability matrix from a parsed state graph and answers
//! bounded-horizon hitting-probability and predecessor queries against it.

pub mod engine;
pub mod storage;

// Re-export commonly used types
pub use engine::analysis::{cumulative_series, step_series, SeriesMap};
pub use engine::errors::AnalysisError;
pub use engine::matrix::{TransitionMatrix, ROW_SUM_TOLERANCE};
pub use engine::predecessors::{rank_predecessors, PredecessorEntry, PredecessorMap};

use markant_frontend::StateGraph;

/// Parse a graph description and build its transition matrix.
///
/// This is a convenience function that combines parsing and matrix
/// construction, converting frontend errors to analysis errors.
pub fn load_model(source: &str) -> Result<(StateGraph, TransitionMatrix), AnalysisError> {
    let graph = markant_frontend::parse_dot(source)?;
    let matrix = TransitionMatrix::from_graph(&graph)?;
    Ok((graph, matrix))
}
