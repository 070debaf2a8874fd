//! Error types for parsing and filtering.

use thiserror::Error;

/// Errors raised while turning graph-description text into a model, or
/// while filtering a model back down to text.
///
/// Marked `#[non_exhaustive]` so new variants can be added without
/// breaking downstream matches.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FrontendError {
    /// The input does not conform to the expected directed-graph grammar,
    /// or violates a structural rule (an edge referencing an undeclared
    /// node, a missing or non-numeric probability annotation). The message
    /// carries the offending line or token.
    #[error("malformed graph: {0}")]
    MalformedGraph(String),

    /// A filter request named a state that does not exist in the graph.
    #[error("unknown target state '{0}'")]
    UnknownTarget(String),
}
