//! Error types for matrix construction and analysis.

use thiserror::Error;

use markant_frontend::FrontendError;

/// Errors that can occur while building the transition matrix or running
/// reachability queries against it.
///
/// Marked `#[non_exhaustive]` to allow adding new error variants without
/// breaking changes. All variants are fatal for the operation that raised
/// them and are never retried: inputs are deterministic, so retrying
/// identical input yields an identical failure.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A matrix row deviates from a probability distribution beyond
    /// tolerance. Signals a data-quality problem in the learned model,
    /// not a recoverable condition.
    #[error("state row {row} is not a probability distribution (sum {sum:.6})")]
    NonStochasticRow { row: usize, sum: f64 },

    /// A caller supplied a source or target index outside the state
    /// space. Fatal for that query only.
    #[error("state index {index} out of range for {states} states")]
    IndexOutOfRange { index: usize, states: usize },

    /// Graph description error surfaced through the frontend.
    #[error(transparent)]
    Frontend(#[from] FrontendError),
}
