//! Simulation driver.
//!
//! Plays the part of the functional simulator in front of the timing model:
//! instructions are allocated, described and submitted in program order, either
//! one at a time through [`Simulator`] or replayed from a JSON Lines trace.

/// Explicit simulation context owning a pipeline.
pub mod simulator;

/// JSON Lines instruction traces.
pub mod trace;

pub use simulator::Simulator;
pub use trace::{TraceReader, TraceRecord};
