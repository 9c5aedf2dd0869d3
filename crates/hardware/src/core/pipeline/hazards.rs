//! Load-Use Hazard Detection.
//!
//! A load produces its value in the memory stage, one cycle too late for an
//! instruction that reads the loaded register in the very next cycle. This unit
//! detects that case and holds the dependent instruction for one cycle:
//! 1. **Reports:** Execute reports the destination of the load it holds; Decode
//!    reports the sources of the instruction it holds. Both arrive during the
//!    same cycle's transmit phase, in either order.
//! 2. **Detection:** The first report of a cycle is buffered and the second
//!    completes the pair and triggers the comparison.
//! 3. **Resolution:** On a match the PC and IF/ID registers are stalled, the
//!    ID/EX register is flushed to a bubble, and one cycle is logged.
//!
//! A report left unpaired (while the pipeline fills or drains only one of the
//! two stages is occupied) is discarded at the next cycle's first report.

use tracing::debug;

use super::latches::RegisterId;
use super::signals::ControlSignals;
use crate::common::constants::ZERO_REGISTER;
use crate::common::{REGISTER_NOT_USED, RegNum};
use crate::core::timing::LatencyLog;

/// Cycles lost to one load-use stall.
pub const LOAD_USE_PENALTY: u64 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Report {
    /// Destination of the load in execute, `None` for anything else.
    Destination(Option<RegNum>),
    /// Sources of the instruction in decode.
    Sources(RegNum, RegNum),
}

#[derive(Clone, Copy, Debug)]
struct PendingReport {
    tick: u64,
    report: Report,
}

/// Detects load-use hazards between the decode and execute stages.
#[derive(Debug)]
pub struct HazardDetectionUnit {
    pc: RegisterId,
    if_id: RegisterId,
    id_ex: RegisterId,
    pending: Option<PendingReport>,
    latency: LatencyLog,
}

impl HazardDetectionUnit {
    /// Creates a unit controlling the given registers.
    ///
    /// # Arguments
    ///
    /// * `pc` - Register feeding fetch; stalled on a hazard.
    /// * `if_id` - Register feeding decode; stalled on a hazard.
    /// * `id_ex` - Register feeding execute; flushed on a hazard.
    pub fn new(pc: RegisterId, if_id: RegisterId, id_ex: RegisterId) -> Self {
        Self {
            pc,
            if_id,
            id_ex,
            pending: None,
            latency: LatencyLog::default(),
        }
    }

    /// Report from execute: the destination register of the load it holds, or
    /// `None` if it holds no load.
    ///
    /// # Arguments
    ///
    /// * `tick` - The current clock tick.
    /// * `rd` - Destination register of the load.
    /// * `signals` - Where stall and flush requests are posted.
    pub fn receive_id_ex_rd(&mut self, tick: u64, rd: Option<RegNum>, signals: &mut ControlSignals) {
        let rd = rd.filter(|&rd| rd != ZERO_REGISTER && rd != REGISTER_NOT_USED);
        self.receive(tick, Report::Destination(rd), signals);
    }

    /// Report from decode: the source registers of the instruction it holds.
    pub fn receive_if_id_rs(&mut self, tick: u64, rs1: RegNum, rs2: RegNum, signals: &mut ControlSignals) {
        self.receive(tick, Report::Sources(rs1, rs2), signals);
    }

    fn receive(&mut self, tick: u64, report: Report, signals: &mut ControlSignals) {
        let buffered = match self.pending.take() {
            Some(pending) if pending.tick == tick => pending.report,
            _ => {
                self.pending = Some(PendingReport { tick, report });
                return;
            }
        };

        let (rd, rs1, rs2) = match (buffered, report) {
            (Report::Destination(rd), Report::Sources(rs1, rs2))
            | (Report::Sources(rs1, rs2), Report::Destination(rd)) => (rd, rs1, rs2),
            (first, second) => {
                panic!("hazard unit received {first:?} and {second:?} in tick {tick}")
            }
        };

        if rd.is_some_and(|rd| rd == rs1 || rd == rs2) {
            debug!(tick, ?rd, rs1, rs2, "load-use hazard");
            signals.request_stall(self.pc);
            signals.request_stall(self.if_id);
            signals.request_flush(self.id_ex);
            self.latency.update(LOAD_USE_PENALTY);
        }
    }

    /// Cycles lost to load-use stalls.
    pub const fn latency(&self) -> &LatencyLog {
        &self.latency
    }
}
