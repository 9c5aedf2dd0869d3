//! Simulator: the explicit context a driver talks to.
//!
//! Owns one [`Pipeline`] and exposes the construct, describe, submit and
//! report cycle of the timing model. There is no global instance; every
//! driver builds its own.

use std::io::BufRead;

use tracing::{debug, info};

use super::trace::{TraceReader, TraceRecord};
use crate::common::{ConfigError, Cycles, TraceError};
use crate::config::Config;
use crate::core::Pipeline;
use crate::core::pipeline::Ticket;
use crate::isa::Instruction;
use crate::stats::{BranchReport, CacheReport, PerformanceReport, SimulationReport};

/// Top-level simulator wrapping the pipeline.
#[derive(Debug)]
pub struct Simulator {
    pipeline: Pipeline,
}

impl Simulator {
    /// Creates a simulator for `config`.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            pipeline: Pipeline::new(config)?,
        })
    }

    /// Allocates an instruction to be described and submitted.
    pub fn create_instruction(&mut self) -> Ticket {
        self.pipeline.create_instruction()
    }

    /// The instruction behind `ticket`.
    pub fn instruction(&self, ticket: Ticket) -> &Instruction {
        self.pipeline.instruction(ticket)
    }

    /// Setter access to the instruction behind `ticket`.
    pub fn instruction_mut(&mut self, ticket: Ticket) -> &mut Instruction {
        self.pipeline.instruction_mut(ticket)
    }

    /// Submits a described instruction and clocks until the pipeline accepts it.
    ///
    /// # Returns
    ///
    /// Cycles that elapsed.
    pub fn submit(&mut self, ticket: Ticket) -> Cycles {
        self.pipeline.read_instruction(ticket)
    }

    /// Allocates, fills and submits one trace record.
    pub fn submit_record(&mut self, record: &TraceRecord) -> Cycles {
        let ticket = self.create_instruction();
        record.apply(self.instruction_mut(ticket));
        self.submit(ticket)
    }

    /// Replays every record of a JSON Lines trace.
    ///
    /// # Returns
    ///
    /// The number of instructions replayed, or the first read or parse error.
    /// Records before the failing line have already been simulated.
    pub fn run_trace<R: BufRead>(&mut self, reader: R) -> Result<u64, TraceError> {
        let mut replayed = 0;
        for record in TraceReader::new(reader) {
            let record = record?;
            let cycles = self.submit_record(&record);
            debug!(pc = record.pc, op = %record.op, cycles, "replayed");
            replayed += 1;
        }
        info!(
            instructions = replayed,
            cycles = self.pipeline.cycle_count(),
            "trace finished"
        );
        Ok(replayed)
    }

    /// Instruction count, cycles, CPI and latency breakdown.
    pub fn report_performance(&self) -> PerformanceReport {
        PerformanceReport::from_pipeline(&self.pipeline)
    }

    /// Per-level cache statistics.
    pub fn report_cache_stats(&self) -> Vec<CacheReport> {
        CacheReport::from_pipeline(&self.pipeline)
    }

    /// Branch predictor statistics.
    pub fn report_branch_stats(&self) -> BranchReport {
        BranchReport::from_pipeline(&self.pipeline)
    }

    /// All reports together.
    pub fn report(&self) -> SimulationReport {
        SimulationReport::from_pipeline(&self.pipeline)
    }

    /// The underlying pipeline.
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}
