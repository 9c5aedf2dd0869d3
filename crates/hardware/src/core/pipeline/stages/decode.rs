//! Instruction Decode (ID) Stage.
//!
//! Operands are decoded by the driver before the instruction enters the
//! pipeline, so decode only tells the hazard unit which registers it reads.

use crate::core::pipeline::engine::SharedUnits;
use crate::core::pipeline::pool::Ticket;
use crate::core::pipeline::traits::{PipelineStage, StageId};

/// The ID stage.
#[derive(Debug, Default)]
pub struct Decode {
    held: Option<Ticket>,
}

impl PipelineStage for Decode {
    fn id(&self) -> StageId {
        StageId::Decode
    }

    fn slot(&self) -> Option<Ticket> {
        self.held
    }

    fn slot_mut(&mut self) -> &mut Option<Ticket> {
        &mut self.held
    }

    fn process(&mut self, ticket: Ticket, _replay: bool, units: &mut SharedUnits) {
        let inst = units.pool.get(ticket);
        let (rs1, rs2) = (inst.rs1, inst.rs2);
        units
            .hazard
            .receive_if_id_rs(units.tick, rs1, rs2, &mut units.signals);
    }
}
