//! Shared helpers for the timing model tests.

/// Fluent builders for trace records.
pub mod builder;
