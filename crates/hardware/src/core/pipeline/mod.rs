//! Instruction pipeline implementation.
//!
//! This module contains the five-stage in-order pipeline. It includes the
//! following components:
//! 1. **Pool:** Arena of in-flight instructions addressed by tickets.
//! 2. **Latches:** Clocked registers between the stages.
//! 3. **Stages:** Fetch, Decode, Execute, Memory and Writeback.
//! 4. **Hazards:** Load-use detection with stall and flush control.
//! 5. **Signals:** Stall and flush requests from the hazard unit to the registers.
//! 6. **Engine:** Assembly of all of the above onto one clock.

/// Pipeline assembly and the driver-facing `Pipeline` type.
pub mod engine;

/// Load-use hazard detection.
pub mod hazards;

/// Pipeline registers (PC, IF/ID, ID/EX, EX/MEM, MEM/WB, Retire).
pub mod latches;

/// Circular instruction pool and tickets.
pub mod pool;

/// Stall and flush requests posted to the registers.
pub mod signals;

/// Pipeline stage implementations (fetch, decode, execute, memory, writeback).
pub mod stages;

/// The pipeline stage trait and stage identifiers.
pub mod traits;

pub use engine::Pipeline;
pub use latches::RegisterId;
pub use pool::{InstructionPool, Ticket};
