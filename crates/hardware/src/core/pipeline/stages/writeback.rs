//! Writeback (WB) Stage.
//!
//! Register values are not modelled, so writeback has no work of its own. The
//! stage exists to give every instruction its fifth cycle; the register after
//! it retires the instruction.

use crate::core::pipeline::engine::SharedUnits;
use crate::core::pipeline::pool::Ticket;
use crate::core::pipeline::traits::{PipelineStage, StageId};

/// The WB stage.
#[derive(Debug, Default)]
pub struct Writeback {
    held: Option<Ticket>,
}

impl PipelineStage for Writeback {
    fn id(&self) -> StageId {
        StageId::Writeback
    }

    fn slot(&self) -> Option<Ticket> {
        self.held
    }

    fn slot_mut(&mut self) -> &mut Option<Ticket> {
        &mut self.held
    }

    fn process(&mut self, _ticket: Ticket, _replay: bool, _units: &mut SharedUnits) {}
}
