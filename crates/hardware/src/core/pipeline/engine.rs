//! Pipeline assembly and driver interface.
//!
//! Wires the six registers onto the clock, builds the stages and the units they
//! share, and exposes the operations a driver needs: allocate an instruction,
//! describe it, feed it to the PC register and read back the statistics.

use tracing::debug;

use super::hazards::HazardDetectionUnit;
use super::latches::{PipelineRegister, RegisterId};
use super::pool::{InstructionPool, Ticket};
use super::signals::ControlSignals;
use super::stages::{Decode, Execute, Fetch, Memory, Stages, Writeback};
use super::traits::{PipelineStage, StageId};
use crate::common::{ConfigError, Cycles};
use crate::config::Config;
use crate::core::clock::Clock;
use crate::core::timing::SkippedFlushCycles;
use crate::core::units::bru::BranchPredictor;
use crate::core::units::cache::{HierarchyPorts, MemoryHierarchy};
use crate::isa::Instruction;

/// Resources every stage may use while processing.
#[derive(Debug)]
pub struct SharedUnits {
    /// Storage for in-flight instructions.
    pub pool: InstructionPool,
    /// Caches and backing memory.
    pub memory: MemoryHierarchy,
    /// Direction and target predictor.
    pub predictor: BranchPredictor,
    /// Load-use hazard detection.
    pub hazard: HazardDetectionUnit,
    /// Stall and flush requests for the registers.
    pub signals: ControlSignals,
    /// Current clock tick, used to pair hazard reports.
    pub tick: u64,
}

/// Everything the registers act on during a tick.
#[derive(Debug)]
pub struct Datapath {
    /// The five stages.
    pub stages: Stages,
    /// Units shared by the stages.
    pub units: SharedUnits,
}

/// A five-stage in-order pipeline.
#[derive(Debug)]
pub struct Pipeline {
    clock: Clock<PipelineRegister>,
    datapath: Datapath,
    ports: HierarchyPorts,
    fill_latency: Cycles,
    instructions: u64,
    trace_pipeline: bool,
}

impl Pipeline {
    /// Builds an empty pipeline.
    ///
    /// # Arguments
    ///
    /// * `config` - Machine parameters; validated before use.
    ///
    /// # Returns
    ///
    /// The pipeline, or the reason `config` was rejected.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut clock = Clock::new();
        for id in RegisterId::ALL {
            let _ = clock.register(PipelineRegister::new(id));
        }
        let counter = clock.counter();

        let (memory, ports) = MemoryHierarchy::split_l1(&config.cache, &counter);
        let flush = SkippedFlushCycles::new(counter.clone(), config.branch.mispredict_penalty);
        let units = SharedUnits {
            pool: InstructionPool::new(config.pipeline.pool_capacity),
            memory,
            predictor: BranchPredictor::new(&config.branch, Some(Box::new(flush))),
            hazard: HazardDetectionUnit::new(RegisterId::Pc, RegisterId::IfId, RegisterId::IdEx),
            signals: ControlSignals::default(),
            tick: 0,
        };
        let stages = Stages {
            fetch: Fetch::new(ports.l1_i),
            decode: Decode::default(),
            execute: Execute::new(&config.execution, &counter),
            memory: Memory::new(ports.l1_d),
            writeback: Writeback::default(),
        };

        Ok(Self {
            clock,
            datapath: Datapath { stages, units },
            ports,
            fill_latency: config.pipeline.fill_latency,
            instructions: 0,
            trace_pipeline: config.general.trace_pipeline,
        })
    }

    /// Allocates a fresh instruction record.
    pub fn create_instruction(&mut self) -> Ticket {
        self.datapath.units.pool.allocate()
    }

    /// The instruction behind `ticket`.
    pub fn instruction(&self, ticket: Ticket) -> &Instruction {
        self.datapath.units.pool.get(ticket)
    }

    /// Mutable access to the instruction behind `ticket`, for the driver to fill in.
    pub fn instruction_mut(&mut self, ticket: Ticket) -> &mut Instruction {
        self.datapath.units.pool.get_mut(ticket)
    }

    /// Feeds `ticket` to the PC register and clocks until it is accepted.
    ///
    /// Ticks once, then keeps ticking while the PC register is stalled.
    ///
    /// # Returns
    ///
    /// Cycles that elapsed, including skipped ones.
    pub fn read_instruction(&mut self, ticket: Ticket) -> Cycles {
        assert!(!ticket.is_bubble(), "the bubble cannot be submitted");
        let start = self.clock.cycle_count();

        self.clock.unit_mut(RegisterId::Pc.index()).load(ticket);
        self.instructions += 1;

        self.tick();
        while self.is_stalled() {
            self.tick();
        }
        self.clock.cycle_count() - start
    }

    /// Advances the pipeline by one clock tick.
    ///
    /// Only [`Pipeline::read_instruction`] ticks: the PC register re-delivers what
    /// it holds every cycle, so an extra tick would fetch the same instruction twice.
    fn tick(&mut self) {
        self.datapath.units.tick = self.clock.ticks();
        self.clock.tick(&mut self.datapath);

        if self.trace_pipeline {
            let occupancy = RegisterId::ALL
                .iter()
                .map(|&id| match self.register(id).held() {
                    Some(ticket) => format!("{}={ticket}", id.name()),
                    None => format!("{}=-", id.name()),
                })
                .collect::<Vec<_>>()
                .join(" ");
            debug!(tick = self.clock.ticks(), "{occupancy}");
        }
    }

    /// Returns `true` while the PC register is stalled.
    pub fn is_stalled(&self) -> bool {
        self.register(RegisterId::Pc).is_stalled()
    }

    /// Instructions submitted so far.
    pub const fn instruction_count(&self) -> u64 {
        self.instructions
    }

    /// Total cycles: elapsed and skipped clock cycles plus the drain of the
    /// last instruction. Zero before anything was submitted.
    pub fn cycle_count(&self) -> Cycles {
        if self.instructions == 0 {
            0
        } else {
            self.clock.cycle_count() + self.fill_latency
        }
    }

    /// Clock ticks executed, excluding skipped cycles.
    pub const fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    /// The register identified by `id`.
    pub fn register(&self, id: RegisterId) -> &PipelineRegister {
        self.clock.unit(id.index())
    }

    /// The instruction the stage identified by `id` holds.
    pub fn stage_holding(&self, id: StageId) -> Option<Ticket> {
        self.datapath.stages.get(id).slot()
    }

    /// Level handles of the memory hierarchy.
    pub const fn ports(&self) -> HierarchyPorts {
        self.ports
    }

    /// The memory hierarchy.
    pub const fn memory(&self) -> &MemoryHierarchy {
        &self.datapath.units.memory
    }

    /// The branch predictor.
    pub const fn predictor(&self) -> &BranchPredictor {
        &self.datapath.units.predictor
    }

    /// The hazard detection unit.
    pub const fn hazard_unit(&self) -> &HazardDetectionUnit {
        &self.datapath.units.hazard
    }

    /// The execute stage and its execution units.
    pub const fn execute_stage(&self) -> &Execute {
        &self.datapath.stages.execute
    }

    /// The instruction pool.
    pub const fn pool(&self) -> &InstructionPool {
        &self.datapath.units.pool
    }
}
