//! Shared test fixtures for the jsts analyzer crates.
//!
//! The fixtures are hand-built syntax trees with offsets that match
//! their source text exactly, so tests can assert on real line/column
//! positions without depending on an external parser.

// Test utilities are less strict than production code
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]

pub mod fixtures;

pub use fixtures::{
    branching_function_file, chain_without_else_file, nested_switch_file, parser_output_file,
    void_call_file,
};

// Re-export insta for snapshot testing
pub use insta;
