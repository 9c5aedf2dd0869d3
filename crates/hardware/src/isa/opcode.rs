//! Instruction kinds and their static classification.
//!
//! The timing model never decodes instruction encodings. The driver names each
//! instruction by its `Opcode` and the pipeline only asks a handful of questions
//! about it:
//! 1. **Memory Access:** Is it a load or a store?
//! 2. **Control Flow:** Is it a conditional branch or an unconditional jump?
//! 3. **Dispatch:** Which execution unit computes its result?
//! 4. **Operand Width:** Does it operate on the low 32 bits only (`*w` forms)?

use std::fmt;

use serde::{Deserialize, Serialize};

/// Execution unit an instruction is dispatched to in the execute stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionUnitKind {
    /// Single-cycle integer ALU (arithmetic, logic, shifts, compares, address generation).
    IntAlu,
    /// Pipelined integer multiplier.
    Multiplier,
    /// Iterative integer divider.
    Divider,
    /// No execution unit (system instructions, fences, bubbles).
    None,
}

/// Every instruction kind the model distinguishes.
///
/// Serialized in lower snake case (`addi`, `sfence_vma`) so trace files can name
/// instructions by their mnemonic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Opcode {
    /// Instruction whose kind the driver did not identify.
    #[default]
    Unknown,
    /// No operation. Also the kind of the pipeline bubble.
    Nop,

    // Zicsr
    Csrrc,
    Csrrci,
    Csrrs,
    Csrrsi,
    Csrrw,
    Csrrwi,

    // System
    Fence,
    Ebreak,
    Ecall,
    Mret,
    Sret,
    SfenceVma,
    Wfi,

    // Arithmetic
    Add,
    Addi,
    Sub,
    Addw,
    Addiw,
    Subw,
    Lui,
    Auipc,

    // Logic
    And,
    Or,
    Xor,
    Andi,
    Ori,
    Xori,

    // Shifts
    Sll,
    Sra,
    Srl,
    Slli,
    Srai,
    Srli,
    Sllw,
    Sraw,
    Srlw,
    Slliw,
    Sraiw,
    Srliw,

    // Compare
    Slt,
    Sltu,
    Slti,
    Sltiu,

    // Branches
    Beq,
    Bne,
    Bge,
    Blt,
    Bgeu,
    Bltu,

    // Jumps
    Jal,
    Jalr,

    // Loads
    Lb,
    Lbu,
    Lh,
    Lhu,
    Lw,
    Lwu,
    Ld,

    // Stores
    Sb,
    Sh,
    Sw,
    Sd,

    // M extension
    Mul,
    Mulh,
    Mulhu,
    Mulhsu,
    Mulw,
    Div,
    Divu,
    Divw,
    Divuw,
    Rem,
    Remu,
    Remw,
    Remuw,
}

impl Opcode {
    /// Returns `true` for memory loads (`lb` through `ld`).
    pub const fn is_load(self) -> bool {
        matches!(
            self,
            Self::Lb | Self::Lbu | Self::Lh | Self::Lhu | Self::Lw | Self::Lwu | Self::Ld
        )
    }

    /// Returns `true` for memory stores (`sb` through `sd`).
    pub const fn is_store(self) -> bool {
        matches!(self, Self::Sb | Self::Sh | Self::Sw | Self::Sd)
    }

    /// Returns `true` for conditional branches.
    pub const fn is_branch(self) -> bool {
        matches!(
            self,
            Self::Beq | Self::Bne | Self::Bge | Self::Blt | Self::Bgeu | Self::Bltu
        )
    }

    /// Returns `true` for unconditional jumps (`jal`, `jalr`).
    pub const fn is_jump(self) -> bool {
        matches!(self, Self::Jal | Self::Jalr)
    }

    /// Returns `true` for operations on the low 32 bits of their operands.
    pub const fn is_word_op(self) -> bool {
        matches!(
            self,
            Self::Addw
                | Self::Addiw
                | Self::Subw
                | Self::Sllw
                | Self::Sraw
                | Self::Srlw
                | Self::Slliw
                | Self::Sraiw
                | Self::Srliw
                | Self::Mulw
                | Self::Divw
                | Self::Divuw
                | Self::Remw
                | Self::Remuw
        )
    }

    /// Returns `true` for divisions and remainders that interpret their operands as signed.
    pub const fn is_signed_division(self) -> bool {
        matches!(self, Self::Div | Self::Divw | Self::Rem | Self::Remw)
    }

    /// Execution unit the instruction occupies in the execute stage.
    ///
    /// Loads, stores, branches and jumps use the ALU for address or target
    /// generation. Multiplies go to the multiplier, divides and remainders to the
    /// divider. Everything else needs no execution unit.
    pub const fn execution_unit(self) -> ExecutionUnitKind {
        match self {
            Self::Mul | Self::Mulh | Self::Mulhu | Self::Mulhsu | Self::Mulw => {
                ExecutionUnitKind::Multiplier
            }
            Self::Div
            | Self::Divu
            | Self::Divw
            | Self::Divuw
            | Self::Rem
            | Self::Remu
            | Self::Remw
            | Self::Remuw => ExecutionUnitKind::Divider,
            Self::Unknown
            | Self::Nop
            | Self::Csrrc
            | Self::Csrrci
            | Self::Csrrs
            | Self::Csrrsi
            | Self::Csrrw
            | Self::Csrrwi
            | Self::Fence
            | Self::Ebreak
            | Self::Ecall
            | Self::Mret
            | Self::Sret
            | Self::SfenceVma
            | Self::Wfi => ExecutionUnitKind::None,
            _ => ExecutionUnitKind::IntAlu,
        }
    }

    /// Lower-case assembler mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Nop => "nop",
            Self::Csrrc => "csrrc",
            Self::Csrrci => "csrrci",
            Self::Csrrs => "csrrs",
            Self::Csrrsi => "csrrsi",
            Self::Csrrw => "csrrw",
            Self::Csrrwi => "csrrwi",
            Self::Fence => "fence",
            Self::Ebreak => "ebreak",
            Self::Ecall => "ecall",
            Self::Mret => "mret",
            Self::Sret => "sret",
            Self::SfenceVma => "sfence.vma",
            Self::Wfi => "wfi",
            Self::Add => "add",
            Self::Addi => "addi",
            Self::Sub => "sub",
            Self::Addw => "addw",
            Self::Addiw => "addiw",
            Self::Subw => "subw",
            Self::Lui => "lui",
            Self::Auipc => "auipc",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Andi => "andi",
            Self::Ori => "ori",
            Self::Xori => "xori",
            Self::Sll => "sll",
            Self::Sra => "sra",
            Self::Srl => "srl",
            Self::Slli => "slli",
            Self::Srai => "srai",
            Self::Srli => "srli",
            Self::Sllw => "sllw",
            Self::Sraw => "sraw",
            Self::Srlw => "srlw",
            Self::Slliw => "slliw",
            Self::Sraiw => "sraiw",
            Self::Srliw => "srliw",
            Self::Slt => "slt",
            Self::Sltu => "sltu",
            Self::Slti => "slti",
            Self::Sltiu => "sltiu",
            Self::Beq => "beq",
            Self::Bne => "bne",
            Self::Bge => "bge",
            Self::Blt => "blt",
            Self::Bgeu => "bgeu",
            Self::Bltu => "bltu",
            Self::Jal => "jal",
            Self::Jalr => "jalr",
            Self::Lb => "lb",
            Self::Lbu => "lbu",
            Self::Lh => "lh",
            Self::Lhu => "lhu",
            Self::Lw => "lw",
            Self::Lwu => "lwu",
            Self::Ld => "ld",
            Self::Sb => "sb",
            Self::Sh => "sh",
            Self::Sw => "sw",
            Self::Sd => "sd",
            Self::Mul => "mul",
            Self::Mulh => "mulh",
            Self::Mulhu => "mulhu",
            Self::Mulhsu => "mulhsu",
            Self::Mulw => "mulw",
            Self::Div => "div",
            Self::Divu => "divu",
            Self::Divw => "divw",
            Self::Divuw => "divuw",
            Self::Rem => "rem",
            Self::Remu => "remu",
            Self::Remw => "remw",
            Self::Remuw => "remuw",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
