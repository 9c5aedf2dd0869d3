//! # Unit Components
//!
//! Organises the unit tests by the crate module they exercise.


/// Clock, pipeline, execution units, caches and branch prediction.
pub mod core;

/// Opcode classification and instruction records.
pub mod isa;

/// Trace parsing and the simulator context.
pub mod sim;

/// Derived report metrics.
pub mod stats;
