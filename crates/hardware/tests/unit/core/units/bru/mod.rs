//! Branch prediction unit tests.

pub mod bht;
