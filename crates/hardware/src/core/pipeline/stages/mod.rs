//! Pipeline stage implementations.
//!
//! This module contains the five stages of the pipeline. It includes:
//! 1. **Fetch:** Accesses the instruction cache and predicts branches.
//! 2. **Decode:** Reports source registers to the hazard unit.
//! 3. **Execute:** Reports load destinations, dispatches to an execution unit and
//!    verifies branch predictions.
//! 4. **Memory:** Accesses the data cache for loads and stores.
//! 5. **Writeback:** Holds the instruction for its final cycle.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Writeback stage implementation.
pub mod writeback;

pub use decode::Decode;
pub use execute::Execute;
pub use fetch::Fetch;
pub use memory::Memory;
pub use writeback::Writeback;

use super::traits::{PipelineStage, StageId};

/// All five stages of the datapath.
#[derive(Debug)]
pub struct Stages {
    /// IF stage.
    pub fetch: Fetch,
    /// ID stage.
    pub decode: Decode,
    /// EX stage.
    pub execute: Execute,
    /// MEM stage.
    pub memory: Memory,
    /// WB stage.
    pub writeback: Writeback,
}

impl Stages {
    /// The stage identified by `id`.
    pub fn get(&self, id: StageId) -> &dyn PipelineStage {
        match id {
            StageId::Fetch => &self.fetch,
            StageId::Decode => &self.decode,
            StageId::Execute => &self.execute,
            StageId::Memory => &self.memory,
            StageId::Writeback => &self.writeback,
        }
    }

    /// Mutable access to the stage identified by `id`.
    pub fn get_mut(&mut self, id: StageId) -> &mut dyn PipelineStage {
        match id {
            StageId::Fetch => &mut self.fetch,
            StageId::Decode => &mut self.decode,
            StageId::Execute => &mut self.execute,
            StageId::Memory => &mut self.memory,
            StageId::Writeback => &mut self.writeback,
        }
    }
}
