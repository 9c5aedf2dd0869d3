//! Instruction Fetch (IF) Stage.
//!
//! Fetch reads the instruction's line through the L1 instruction cache and, for a
//! conditional branch, asks the branch predictor where fetch goes next. The
//! prediction is stored on the instruction so execute can verify it.
//!
//! A stalled PC register delivers the same instruction again; that replay is
//! not a second fetch and is ignored.

use tracing::trace;

use crate::core::pipeline::engine::SharedUnits;
use crate::core::pipeline::pool::Ticket;
use crate::core::pipeline::traits::{PipelineStage, StageId};
use crate::core::units::cache::LevelId;

/// The IF stage.
#[derive(Debug)]
pub struct Fetch {
    held: Option<Ticket>,
    icache: LevelId,
}

impl Fetch {
    /// Creates a fetch stage reading through `icache`.
    pub const fn new(icache: LevelId) -> Self {
        Self { held: None, icache }
    }
}

impl PipelineStage for Fetch {
    fn id(&self) -> StageId {
        StageId::Fetch
    }

    fn slot(&self) -> Option<Ticket> {
        self.held
    }

    fn slot_mut(&mut self) -> &mut Option<Ticket> {
        &mut self.held
    }

    fn process(&mut self, ticket: Ticket, replay: bool, units: &mut SharedUnits) {
        if replay || ticket.is_bubble() {
            return;
        }

        let inst = units.pool.get(ticket);
        let (pc, is_branch) = (inst.addr, inst.is_branch());

        let latency = units.memory.access(self.icache, pc, false);
        trace!(pc, latency, "fetch");

        if is_branch {
            let prediction = units.predictor.predict(pc);
            units.pool.get_mut(ticket).prediction = Some(prediction);
        }
    }
}
