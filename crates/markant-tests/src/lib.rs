//! Integration and property tests for the markant workspace live in
//! `tests/`; this crate intentionally exports nothing.
