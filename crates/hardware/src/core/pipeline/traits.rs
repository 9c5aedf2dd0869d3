//! Pipeline Stage Interface.
//!
//! A stage is the combinational part of the pipeline: it holds at most one
//! instruction, does its work the moment it receives one, and hands it to the
//! following register when asked.

use tracing::trace;

use super::engine::SharedUnits;
use super::pool::Ticket;

/// Identifies one of the five stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Instruction fetch.
    Fetch,
    /// Instruction decode.
    Decode,
    /// Execute.
    Execute,
    /// Data memory access.
    Memory,
    /// Register writeback.
    Writeback,
}

impl StageId {
    /// Short stage name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fetch => "IF",
            Self::Decode => "ID",
            Self::Execute => "EX",
            Self::Memory => "MEM",
            Self::Writeback => "WB",
        }
    }
}

/// Represents a stage in the instruction pipeline.
///
/// Implementors provide the holding slot and the stage-specific `process`;
/// `receive` and `flow_out` implement the shared hand-off protocol.
pub trait PipelineStage {
    /// Which stage this is.
    fn id(&self) -> StageId;

    /// The held instruction slot.
    fn slot(&self) -> Option<Ticket>;

    /// Mutable access to the held instruction slot.
    fn slot_mut(&mut self) -> &mut Option<Ticket>;

    /// Stage-specific work on a newly received instruction.
    ///
    /// Must finish before returning; the clock does not wait for stages.
    ///
    /// # Arguments
    ///
    /// * `ticket` - The received instruction.
    /// * `replay` - `true` when the stage already held this same instruction, which
    ///   happens when a stalled register delivers it a second time.
    /// * `units` - Shared pipeline resources.
    fn process(&mut self, ticket: Ticket, replay: bool, units: &mut SharedUnits);

    /// Takes `ticket` and processes it.
    fn receive(&mut self, ticket: Ticket, units: &mut SharedUnits) {
        let replay = self.slot() == Some(ticket);
        *self.slot_mut() = Some(ticket);
        trace!(stage = self.id().name(), ?ticket, replay, "stage received");
        self.process(ticket, replay, units);
    }

    /// Hands the held instruction to the following register, leaving the stage empty.
    fn flow_out(&mut self) -> Option<Ticket> {
        self.slot_mut().take()
    }
}
