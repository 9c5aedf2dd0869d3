//! Instruction set definitions.
//!
//! The model is driven by pre-decoded instruction records rather than raw
//! encodings, so this module only describes what an instruction *is*.
//!
//! # Contents
//!
//! * `opcode`: Instruction kinds and their classification.
//! * `instruction`: The per-instruction record carried through the pipeline.

/// Instruction record and operand-format setters.
pub mod instruction;

/// Instruction kinds, classifiers and execution-unit dispatch.
pub mod opcode;

pub use instruction::Instruction;
pub use opcode::{ExecutionUnitKind, Opcode};
