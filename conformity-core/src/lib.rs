//! Core functionality for Conformity generator conformance testing.
//!
//! This crate provides the reusable battery of invariant checks that any
//! seeded, tree-shrinking value generator must satisfy, together with the
//! primitives needed to apply them: a deterministic draw source, a lazy
//! shrink tree, a cyclic shrink-path walker, and the min/max ordering
//! helper for range-style configurations.

pub mod conform;
pub mod data;
pub mod error;
pub mod gen;
pub mod tree;
pub mod walk;

// Re-export the main types
pub use conform::*;
pub use data::*;
pub use error::*;
pub use gen::*;
pub use tree::*;
pub use walk::*;
