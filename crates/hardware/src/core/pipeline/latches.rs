//! Pipeline registers.
//!
//! Registers are the only clocked elements of the pipeline. Each one sits
//! between two stages and moves at most one instruction per cycle:
//! 1. **Transmit (`clock_start`):** Consume a stall left over from the previous
//!    cycle, then deliver the held instruction to the next stage.
//! 2. **Accept (`clock_end`):** Collect stall and flush requests posted during
//!    this cycle's transmits. Unless stalled, take the previous stage's
//!    instruction. A pending flush then turns the held instruction into the bubble.
//!
//! A register keeps its instruction after transmitting it; only a successful
//! accept overwrites it. That is what lets a stalled register deliver the same
//! instruction again in the following cycle.

use tracing::trace;

use super::engine::Datapath;
use super::pool::Ticket;
use super::traits::StageId;
use crate::common::constants::PIPELINE_REGISTERS;
use crate::core::clock::Clocked;

/// Identifies one of the six pipeline registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegisterId {
    /// Program counter register, loaded by the driver, feeding fetch.
    Pc,
    /// Fetch to decode.
    IfId,
    /// Decode to execute.
    IdEx,
    /// Execute to memory.
    ExMem,
    /// Memory to writeback.
    MemWb,
    /// After writeback; retires instructions back to the pool.
    Retire,
}

impl RegisterId {
    /// Number of registers.
    pub const COUNT: usize = PIPELINE_REGISTERS;

    /// Every register, front to back.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Pc,
        Self::IfId,
        Self::IdEx,
        Self::ExMem,
        Self::MemWb,
        Self::Retire,
    ];

    /// Position from the front of the pipeline.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Register name as used in reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pc => "PC",
            Self::IfId => "IF/ID",
            Self::IdEx => "ID/EX",
            Self::ExMem => "EX/MEM",
            Self::MemWb => "MEM/WB",
            Self::Retire => "Retire",
        }
    }

    /// Stage the register collects from.
    pub const fn previous(self) -> Option<StageId> {
        match self {
            Self::Pc => None,
            Self::IfId => Some(StageId::Fetch),
            Self::IdEx => Some(StageId::Decode),
            Self::ExMem => Some(StageId::Execute),
            Self::MemWb => Some(StageId::Memory),
            Self::Retire => Some(StageId::Writeback),
        }
    }

    /// Stage the register delivers to.
    pub const fn next(self) -> Option<StageId> {
        match self {
            Self::Pc => Some(StageId::Fetch),
            Self::IfId => Some(StageId::Decode),
            Self::IdEx => Some(StageId::Execute),
            Self::ExMem => Some(StageId::Memory),
            Self::MemWb => Some(StageId::Writeback),
            Self::Retire => None,
        }
    }
}

/// A synchronous latch between two stages.
#[derive(Clone, Debug)]
pub struct PipelineRegister {
    id: RegisterId,
    held: Option<Ticket>,
    stalled: bool,
    flush_pending: bool,
}

impl PipelineRegister {
    /// Creates an empty register.
    pub const fn new(id: RegisterId) -> Self {
        Self {
            id,
            held: None,
            stalled: false,
            flush_pending: false,
        }
    }

    /// Which register this is.
    pub const fn id(&self) -> RegisterId {
        self.id
    }

    /// The held instruction.
    pub const fn held(&self) -> Option<Ticket> {
        self.held
    }

    /// Returns `true` while a stall is in effect.
    pub const fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// Places `ticket` in the register directly. The driver loads the PC register this way.
    pub fn load(&mut self, ticket: Ticket) {
        self.held = Some(ticket);
    }

    /// Suppresses the next accept.
    pub fn receive_stall(&mut self) {
        self.stalled = true;
    }

    /// Replaces the held instruction with the bubble after the next accept.
    ///
    /// # Panics
    ///
    /// Panics if the register holds nothing.
    pub fn flush(&mut self) {
        assert!(self.held.is_some(), "flush of empty register {}", self.id.name());
        self.flush_pending = true;
    }

    fn transmit(&mut self, dp: &mut Datapath) {
        let (Some(ticket), Some(next)) = (self.held, self.id.next()) else {
            return;
        };
        dp.stages.get_mut(next).receive(ticket, &mut dp.units);
    }

    fn accept(&mut self, dp: &mut Datapath) {
        if self.stalled {
            trace!(register = self.id.name(), "accept stalled");
            return;
        }
        let Some(previous) = self.id.previous() else {
            return;
        };
        if let Some(ticket) = dp.stages.get_mut(previous).flow_out() {
            self.held = Some(ticket);
        }
    }

    fn retire(&mut self, dp: &mut Datapath) {
        match self.held.take() {
            Some(ticket) if !ticket.is_bubble() => dp.units.pool.free(ticket),
            _ => {}
        }
    }
}

impl Clocked<Datapath> for PipelineRegister {
    fn clock_start(&mut self, dp: &mut Datapath) {
        if self.stalled {
            trace!(register = self.id.name(), "stall consumed");
            self.stalled = false;
        }
        self.transmit(dp);
    }

    fn clock_end(&mut self, dp: &mut Datapath) {
        let request = dp.units.signals.take(self.id);
        if request.stall {
            self.receive_stall();
        }
        if request.flush {
            self.flush();
        }

        self.accept(dp);

        if self.flush_pending {
            trace!(register = self.id.name(), "flushed to bubble");
            self.held = Some(Ticket::BUBBLE);
            self.flush_pending = false;
        }
        if self.id == RegisterId::Retire {
            self.retire(dp);
        }
    }
}
