//! Deterministic JSON serialization for files written by the client.
//!
//! Output is stable between writes:
//! - Object keys sorted (via `BTreeMap` in the stored types)
//! - 2-space indentation
//! - Trailing newline

mod json;

pub use json::*;
