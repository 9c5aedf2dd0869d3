//! Unit tests for the clock, timing policies, the pipeline and its units.

pub mod pipeline;
pub mod units;
