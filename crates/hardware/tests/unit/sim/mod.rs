//! Trace replay and the simulator context.

pub mod simulator;
pub mod trace;
