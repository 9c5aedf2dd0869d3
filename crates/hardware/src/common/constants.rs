//! Global model constants.
//!
//! This module defines the fixed shape of the modelled pipeline. It includes:
//! 1. **Pipeline Shape:** Stage and register counts of the five-stage datapath.
//! 2. **Register Sentinels:** The marker for an unused register operand.
//! 3. **Capacity Limits:** The smallest instruction pool the pipeline can run with.

/// Cycle count type used by the clock, the latency logs and the stall policies.
pub type Cycles = u64;

/// Architectural register number (`x0`..`x31`).
pub type RegNum = u32;

/// Marks a register operand that the instruction does not use.
///
/// Hazard comparisons never match on this value.
pub const REGISTER_NOT_USED: RegNum = RegNum::MAX;

/// The hard-wired zero register. Writes to it are discarded, so a load into it
/// never creates a dependency.
pub const ZERO_REGISTER: RegNum = 0;

/// Number of stages in the datapath (IF, ID, EX, MEM, WB).
pub const PIPELINE_STAGES: usize = 5;

/// Number of pipeline registers (PC, IF/ID, ID/EX, EX/MEM, MEM/WB, Retire).
pub const PIPELINE_REGISTERS: usize = PIPELINE_STAGES + 1;

/// Cycles needed to drain the last instruction from fetch to retirement.
///
/// Added once to the measured cycle count.
pub const PIPELINE_FILL_LATENCY: Cycles = (PIPELINE_STAGES - 1) as Cycles;

/// Smallest pool that can back every pipeline register plus the instruction
/// being built by the driver.
///
/// Each of the six registers may keep a stale reference to an instruction that
/// already moved on, and each of the five stages holds one, so the pool must
/// never recycle a slot that is still reachable from either.
pub const MIN_POOL_CAPACITY: usize = PIPELINE_STAGES + PIPELINE_REGISTERS;
