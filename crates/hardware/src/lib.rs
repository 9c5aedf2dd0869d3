//! RISC-V pipeline timing model.
//!
//! This crate computes how long a stream of already-executed RISC-V instructions
//! takes on a five-stage in-order pipeline, and what the caches evict along the way:
//! 1. **Core:** A two-phase clock driving IF/ID/EX/MEM/WB stages through pipeline registers.
//! 2. **Hazards:** Load-use detection with stall and bubble insertion.
//! 3. **Units:** BHT/BTB branch prediction, a Tree-PLRU cache hierarchy and
//!    variable-latency execution units.
//! 4. **Simulation:** A driver context, trace replay, configuration and reporting.
//!
//! Values are never computed: the driver supplies decoded operands, addresses and
//! branch outcomes, and the model only accounts for time.

/// Common types, constants and error definitions.
pub mod common;
/// Model configuration (defaults, JSON loading, validation).
pub mod config;
/// Clock, pipeline, functional units and stall accounting.
pub mod core;
/// Instruction kinds and the per-instruction record.
pub mod isa;
/// Simulation driver and trace replay.
pub mod sim;
/// Performance, cache and branch prediction reports.
pub mod stats;

/// Root configuration type; use `Config::default()` or load it from JSON.
pub use crate::config::Config;
/// The five-stage pipeline.
pub use crate::core::Pipeline;
/// Driver context; construct with `Simulator::new`.
pub use crate::sim::Simulator;
