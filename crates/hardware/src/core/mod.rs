//! Pipeline timing core.
//!
//! This module contains the clocked machinery of the model: the two-phase clock,
//! the five-stage pipeline built on it, the functional units the stages drive,
//! and the stall policies that turn unit latencies into elapsed cycles.

/// Two-phase synchronous clock and shared cycle counter.
pub mod clock;

/// Instruction pool, pipeline registers, stages and hazard detection.
pub mod pipeline;

/// Stall and flush policies and per-unit latency logs.
pub mod timing;

/// Branch prediction, caches and execution units.
pub mod units;

pub use self::clock::{Clock, Clocked, CycleCounter};
pub use self::pipeline::Pipeline;
