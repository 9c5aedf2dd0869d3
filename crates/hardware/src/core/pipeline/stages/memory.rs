//! Memory Access (MEM) Stage.
//!
//! Loads read and stores write their effective address through the L1 data
//! cache. Every other instruction passes through untouched.

use tracing::trace;

use crate::core::pipeline::engine::SharedUnits;
use crate::core::pipeline::pool::Ticket;
use crate::core::pipeline::traits::{PipelineStage, StageId};
use crate::core::units::cache::LevelId;

/// The MEM stage.
#[derive(Debug)]
pub struct Memory {
    held: Option<Ticket>,
    dcache: LevelId,
}

impl Memory {
    /// Creates a memory stage accessing `dcache`.
    pub const fn new(dcache: LevelId) -> Self {
        Self { held: None, dcache }
    }
}

impl PipelineStage for Memory {
    fn id(&self) -> StageId {
        StageId::Memory
    }

    fn slot(&self) -> Option<Ticket> {
        self.held
    }

    fn slot_mut(&mut self) -> &mut Option<Ticket> {
        &mut self.held
    }

    fn process(&mut self, ticket: Ticket, _replay: bool, units: &mut SharedUnits) {
        let inst = units.pool.get(ticket);
        let (addr, is_load, is_store) = (inst.ls_addr, inst.is_load(), inst.is_store());
        if !(is_load || is_store) {
            return;
        }
        let latency = units.memory.access(self.dcache, addr, is_store);
        trace!(addr, is_store, latency, "data access");
    }
}
