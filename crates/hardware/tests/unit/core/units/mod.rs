//! Unit tests for the functional units.

pub mod bru;
