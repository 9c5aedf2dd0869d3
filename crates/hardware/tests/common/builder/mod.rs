//! Builders for test inputs.

/// [`InstructionBuilder`] and shorthand constructors for common instructions.
pub mod instruction;

pub use instruction::{InstructionBuilder, alu, branch, divide, load, store};
