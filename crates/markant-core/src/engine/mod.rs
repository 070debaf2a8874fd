//! The analysis engine for learned stochastic automata.
//!
//! This module provides:
//! - **errors**: Error types for construction and query failures
//! - **matrix**: Transition matrix construction with the absorbing-row policy
//! - **analysis**: Step-wise and cumulative reachability series
//! - **predecessors**: Ranked direct-predecessor explanations

pub mod analysis;
pub mod errors;
pub mod matrix;
pub mod predecessors;
