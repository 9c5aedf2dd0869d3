//! Execution units.
//!
//! Each unit reports how many cycles an instruction occupies it beyond the
//! single execute cycle every instruction gets. The latency comes from a
//! [`LatencyModel`]; the surrounding [`ExecutionUnit`] logs it and charges it to
//! the clock through its stall policy.
//!
//! - [`IntegerAlu`]: fully pipelined, no extra cycles.
//! - [`Multiplier`]: fixed latency.
//! - [`Divider`]: operand-dependent latency of an iterative divider.

/// Variable-latency divider model.
pub mod divider;

pub use divider::Divider;

use tracing::trace;

use crate::common::Cycles;
use crate::core::timing::{LatencyLog, StallPolicy};
use crate::isa::Instruction;

/// Latency of one kind of functional unit.
pub trait LatencyModel {
    /// Extra cycles `inst` occupies the unit.
    fn latency(&self, inst: &Instruction) -> Cycles;
}

/// Single-cycle integer ALU.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntegerAlu;

impl LatencyModel for IntegerAlu {
    fn latency(&self, _inst: &Instruction) -> Cycles {
        0
    }
}

/// Pipelined multiplier with a fixed latency.
#[derive(Clone, Copy, Debug)]
pub struct Multiplier {
    latency: Cycles,
}

impl Multiplier {
    /// Creates a multiplier that takes `latency` cycles per operation.
    pub const fn new(latency: Cycles) -> Self {
        Self { latency }
    }
}

impl LatencyModel for Multiplier {
    fn latency(&self, _inst: &Instruction) -> Cycles {
        self.latency
    }
}

/// A functional unit: a latency model plus stall accounting.
#[derive(Debug)]
pub struct ExecutionUnit<M> {
    model: M,
    stall: Option<Box<dyn StallPolicy>>,
    log: LatencyLog,
}

impl<M: LatencyModel> ExecutionUnit<M> {
    /// Wraps `model`, charging its latency through `stall` if given.
    pub fn new(model: M, stall: Option<Box<dyn StallPolicy>>) -> Self {
        Self {
            model,
            stall,
            log: LatencyLog::default(),
        }
    }

    /// Issues `inst` to the unit.
    ///
    /// # Returns
    ///
    /// The cycles charged for it.
    pub fn execute(&mut self, inst: &Instruction) -> Cycles {
        let cycles = self.model.latency(inst);
        trace!(op = %inst.opcode, cycles, "execute");
        self.log.update(cycles);
        if let Some(policy) = &self.stall {
            policy.stall(cycles);
        }
        cycles
    }

    /// Latency charged so far.
    pub const fn log(&self) -> &LatencyLog {
        &self.log
    }
}
