//! Instruction records flowing through the pipeline.
//!
//! An `Instruction` carries only what the timing model needs: the instruction
//! kind, the register operands used for hazard detection, the addresses the
//! caches and the branch predictor see, and the operand values the divider's
//! latency depends on. The driver fills a record through the format setters
//! (`set_r_type`, `set_i_type`, ...) before submitting it.

use crate::common::{REGISTER_NOT_USED, RegNum};
use crate::core::units::bru::Prediction;

use super::opcode::{ExecutionUnitKind, Opcode};

/// A single instruction as seen by the timing model.
///
/// Register fields hold [`REGISTER_NOT_USED`] when the instruction format has no
/// such operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Program counter of the instruction.
    pub addr: u64,
    /// Effective address of a load or store.
    pub ls_addr: u64,
    /// Resolved target of a branch or jump.
    pub target_addr: u64,
    /// Instruction kind.
    pub opcode: Opcode,
    /// First source register.
    pub rs1: RegNum,
    /// Second source register.
    pub rs2: RegNum,
    /// Destination register.
    pub rd: RegNum,
    /// Value read from `rs1`.
    pub rs1_val: u64,
    /// Value read from `rs2`.
    pub rs2_val: u64,
    /// Resolved direction of a branch.
    pub taken: bool,
    /// Prediction made for this instruction when it was fetched.
    pub prediction: Option<Prediction>,
    in_use: bool,
}

impl Default for Instruction {
    fn default() -> Self {
        Self {
            addr: 0,
            ls_addr: 0,
            target_addr: 0,
            opcode: Opcode::Unknown,
            rs1: REGISTER_NOT_USED,
            rs2: REGISTER_NOT_USED,
            rd: REGISTER_NOT_USED,
            rs1_val: 0,
            rs2_val: 0,
            taken: false,
            prediction: None,
            in_use: false,
        }
    }
}

impl Instruction {
    /// The pipeline bubble: a no-op with no operands that is never allocated.
    pub fn bubble() -> Self {
        Self {
            opcode: Opcode::Nop,
            ..Self::default()
        }
    }

    /// Returns `true` if the instruction is a load.
    pub const fn is_load(&self) -> bool {
        self.opcode.is_load()
    }

    /// Returns `true` if the instruction is a store.
    pub const fn is_store(&self) -> bool {
        self.opcode.is_store()
    }

    /// Returns `true` if the instruction is a conditional branch.
    pub const fn is_branch(&self) -> bool {
        self.opcode.is_branch()
    }

    /// Returns `true` if the instruction is an unconditional jump.
    pub const fn is_jump(&self) -> bool {
        self.opcode.is_jump()
    }

    /// Execution unit this instruction is dispatched to.
    pub const fn execution_unit(&self) -> ExecutionUnitKind {
        self.opcode.execution_unit()
    }

    /// Returns `true` while the record belongs to an in-flight instruction.
    pub const fn is_used(&self) -> bool {
        self.in_use
    }

    /// Resets every field and marks the record as in flight.
    pub(crate) fn allocate(&mut self) {
        *self = Self {
            in_use: true,
            ..Self::default()
        };
    }

    /// Marks the record as free again.
    pub(crate) fn release(&mut self) {
        self.in_use = false;
    }

    /// Sets the program counter.
    pub fn set_addr(&mut self, addr: u64) -> &mut Self {
        self.addr = addr;
        self
    }

    /// Sets the effective address of a load or store.
    pub fn set_ls_addr(&mut self, addr: u64) -> &mut Self {
        self.ls_addr = addr;
        self
    }

    /// Sets the resolved branch or jump target.
    pub fn set_target_addr(&mut self, addr: u64) -> &mut Self {
        self.target_addr = addr;
        self
    }

    /// Sets the source operand values.
    pub fn set_operand_values(&mut self, rs1_val: u64, rs2_val: u64) -> &mut Self {
        self.rs1_val = rs1_val;
        self.rs2_val = rs2_val;
        self
    }

    /// R-type operands: two sources and a destination.
    ///
    /// The argument order follows the encoding's field order (`rs2`, `rs1`, `rd`).
    pub fn set_r_type(&mut self, rs2: RegNum, rs1: RegNum, rd: RegNum) -> &mut Self {
        self.rs2 = rs2;
        self.rs1 = rs1;
        self.rd = rd;
        self
    }

    /// I-type operands: one source and a destination.
    pub fn set_i_type(&mut self, rs1: RegNum, rd: RegNum) -> &mut Self {
        self.rs2 = REGISTER_NOT_USED;
        self.rs1 = rs1;
        self.rd = rd;
        self
    }

    /// I-type without a source register (`csrrwi` and friends, `lui`, `auipc`).
    pub fn set_i_type_no_rs1(&mut self, rd: RegNum) -> &mut Self {
        self.set_uj_type(rd)
    }

    /// I-type without any register operand (`fence`, `ecall`, `ebreak`).
    pub fn set_i_type_no_regs(&mut self) -> &mut Self {
        self.rs2 = REGISTER_NOT_USED;
        self.rs1 = REGISTER_NOT_USED;
        self.rd = REGISTER_NOT_USED;
        self
    }

    /// S-type and B-type operands: two sources, no destination.
    pub fn set_sb_type(&mut self, rs2: RegNum, rs1: RegNum) -> &mut Self {
        self.rs2 = rs2;
        self.rs1 = rs1;
        self.rd = REGISTER_NOT_USED;
        self
    }

    /// U-type and J-type operands: a destination only.
    pub fn set_uj_type(&mut self, rd: RegNum) -> &mut Self {
        self.rs2 = REGISTER_NOT_USED;
        self.rs1 = REGISTER_NOT_USED;
        self.rd = rd;
        self
    }

    /// Sets the instruction kind.
    pub fn set_opcode(&mut self, opcode: Opcode) -> &mut Self {
        self.opcode = opcode;
        self
    }

    /// Sets the resolved branch direction.
    pub fn set_taken(&mut self, taken: bool) -> &mut Self {
        self.taken = taken;
        self
    }
}
