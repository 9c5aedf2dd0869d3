//! Execute (EX) Stage.
//!
//! This stage performs three tasks for every instruction it receives:
//! 1. **Hazard Report:** The destination of a load (or nothing) goes to the hazard unit.
//! 2. **Dispatch:** The instruction occupies its execution unit, whose latency is
//!    charged to the clock.
//! 3. **Branch Resolution:** A conditional branch's fetch-time prediction is
//!    verified against the actual outcome.

use tracing::trace;

use crate::config::ExecutionConfig;
use crate::core::clock::CycleCounter;
use crate::core::pipeline::engine::SharedUnits;
use crate::core::pipeline::pool::Ticket;
use crate::core::pipeline::traits::{PipelineStage, StageId};
use crate::core::timing::{SkippedStallCycles, StallPolicy};
use crate::core::units::exec::{Divider, ExecutionUnit, IntegerAlu, Multiplier};
use crate::isa::ExecutionUnitKind;

/// The EX stage and the execution units it owns.
#[derive(Debug)]
pub struct Execute {
    held: Option<Ticket>,
    alu: ExecutionUnit<IntegerAlu>,
    multiplier: ExecutionUnit<Multiplier>,
    divider: ExecutionUnit<Divider>,
}

impl Execute {
    /// Creates the stage with units charging their latency to `counter`.
    pub fn new(config: &ExecutionConfig, counter: &CycleCounter) -> Self {
        let stall = || -> Option<Box<dyn StallPolicy>> {
            Some(Box::new(SkippedStallCycles::new(counter.clone())))
        };
        Self {
            held: None,
            alu: ExecutionUnit::new(IntegerAlu, stall()),
            multiplier: ExecutionUnit::new(Multiplier::new(config.mul_latency), stall()),
            divider: ExecutionUnit::new(Divider::new(config.div_base_latency), stall()),
        }
    }

    /// The integer ALU.
    pub const fn alu(&self) -> &ExecutionUnit<IntegerAlu> {
        &self.alu
    }

    /// The multiplier.
    pub const fn multiplier(&self) -> &ExecutionUnit<Multiplier> {
        &self.multiplier
    }

    /// The divider.
    pub const fn divider(&self) -> &ExecutionUnit<Divider> {
        &self.divider
    }
}

impl PipelineStage for Execute {
    fn id(&self) -> StageId {
        StageId::Execute
    }

    fn slot(&self) -> Option<Ticket> {
        self.held
    }

    fn slot_mut(&mut self) -> &mut Option<Ticket> {
        &mut self.held
    }

    fn process(&mut self, ticket: Ticket, _replay: bool, units: &mut SharedUnits) {
        let inst = units.pool.get(ticket).clone();

        let rd = inst.is_load().then_some(inst.rd);
        units
            .hazard
            .receive_id_ex_rd(units.tick, rd, &mut units.signals);

        let latency = match inst.execution_unit() {
            ExecutionUnitKind::IntAlu => self.alu.execute(&inst),
            ExecutionUnitKind::Multiplier => self.multiplier.execute(&inst),
            ExecutionUnitKind::Divider => self.divider.execute(&inst),
            ExecutionUnitKind::None => 0,
        };
        trace!(pc = inst.addr, op = %inst.opcode, latency, "executed");

        if inst.is_branch() {
            let prediction = match inst.prediction {
                Some(prediction) => prediction,
                None => units.predictor.predict(inst.addr),
            };
            let _ = units
                .predictor
                .resolve(inst.addr, prediction, inst.taken, inst.target_addr);
        }
    }
}
