//! Conformity generator conformance testing library.
//!
//! This is the main entry point for the Conformity library, re-exporting
//! the conformance suite and the primitives it is built from.

pub use conformity_core::*;
