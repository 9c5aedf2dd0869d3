//! Stall accounting shared by every latency source.
//!
//! Multi-cycle events are not simulated cycle by cycle. Each unit that can hold
//! the pipeline reports the cycles it costs to a policy, and the policy charges
//! them to the clock (see [`crate::core::clock`] for when this is exact).
//! Each unit also keeps a `LatencyLog` of what it charged for the final report.

use std::fmt;

use tracing::trace;

use crate::common::Cycles;
use crate::core::clock::CycleCounter;

/// Converts a known-length stall into elapsed cycles.
pub trait StallPolicy: fmt::Debug {
    /// Charges `cycles` of stall.
    fn stall(&self, cycles: Cycles);
}

/// Converts a pipeline flush into elapsed cycles.
pub trait FlushPolicy: fmt::Debug {
    /// Charges one flush.
    fn flush(&self);

    /// Cycles charged per flush.
    fn penalty(&self) -> Cycles;
}

/// Charges stalls by skipping clock cycles.
#[derive(Clone, Debug)]
pub struct SkippedStallCycles {
    counter: CycleCounter,
}

impl SkippedStallCycles {
    /// Creates a policy charging the clock behind `counter`.
    pub const fn new(counter: CycleCounter) -> Self {
        Self { counter }
    }
}

impl StallPolicy for SkippedStallCycles {
    fn stall(&self, cycles: Cycles) {
        if cycles > 0 {
            trace!(cycles, "stall skipped");
            self.counter.skip(cycles);
        }
    }
}

/// Charges a fixed number of skipped cycles for every misprediction flush.
#[derive(Clone, Debug)]
pub struct SkippedFlushCycles {
    counter: CycleCounter,
    penalty: Cycles,
}

impl SkippedFlushCycles {
    /// Creates a policy charging `penalty` cycles per flush to the clock behind `counter`.
    pub const fn new(counter: CycleCounter, penalty: Cycles) -> Self {
        Self { counter, penalty }
    }
}

impl FlushPolicy for SkippedFlushCycles {
    fn flush(&self) {
        trace!(cycles = self.penalty, "flush skipped");
        self.counter.skip(self.penalty);
    }

    fn penalty(&self) -> Cycles {
        self.penalty
    }
}

/// Running total of cycles charged by one unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LatencyLog {
    total: Cycles,
    events: u64,
}

impl LatencyLog {
    /// Records one event costing `cycles`.
    pub fn update(&mut self, cycles: Cycles) {
        self.total += cycles;
        self.events += 1;
    }

    /// Sum of all recorded cycles.
    pub const fn total(&self) -> Cycles {
        self.total
    }

    /// Number of recorded events, including zero-cycle ones.
    pub const fn events(&self) -> u64 {
        self.events
    }
}
