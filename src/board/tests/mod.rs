//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `magic.rs` - Magic lookups against the ray reference algorithm
//! - `movegen.rs` - Legal move generation, perft counts, pins
//! - `promotion.rs` - Implicit queen promotion and its undo
//! - `search.rs` - Minimax equivalence and budget degradation
//! - `proptest.rs` - Property-based tests

mod movegen;
mod proptest;
