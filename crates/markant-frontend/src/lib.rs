//! # Markant Frontend
//!
//! Parsing, labeling, and filtering for learned stochastic automata
//! described in the learner's DOT-subset convention.

pub mod errors;
pub mod filter;
pub mod labels;
pub mod model;
pub mod parser;

// Re-export commonly used types
pub use errors::FrontendError;
pub use filter::filter_graph;
pub use labels::{completion_labels, parse_label_fields};
pub use model::{NodeId, StateGraph, StateNode, Transition};
pub use parser::parse_dot;
