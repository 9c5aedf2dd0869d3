//! JSON Lines instruction traces.
//!
//! A trace has one JSON object per line, one line per executed instruction, in
//! program order. Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! {"pc": 4096, "op": "ld", "rs1": 2, "rd": 5, "ls_addr": 8192}
//! {"pc": 4100, "op": "add", "rs1": 5, "rs2": 6, "rd": 7}
//! {"pc": 4104, "op": "bne", "rs1": 7, "rs2": 0, "taken": true, "target": 4096}
//! ```
//!
//! Only `pc` and `op` are required. Absent registers are not used by the
//! instruction; absent addresses and values are zero.

use std::io::{BufRead, Lines};

use serde::{Deserialize, Serialize};

use crate::common::{REGISTER_NOT_USED, RegNum, TraceError};
use crate::isa::{Instruction, Opcode};

/// Highest architectural register number.
const MAX_REGISTER: RegNum = 31;

/// One executed instruction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Program counter.
    pub pc: u64,
    /// Instruction kind.
    pub op: Opcode,
    /// First source register.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rs1: Option<RegNum>,
    /// Second source register.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rs2: Option<RegNum>,
    /// Destination register.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rd: Option<RegNum>,
    /// Effective address of a load or store.
    #[serde(default)]
    pub ls_addr: u64,
    /// Resolved branch or jump target.
    #[serde(default)]
    pub target: u64,
    /// Resolved branch direction.
    #[serde(default)]
    pub taken: bool,
    /// Value of `rs1`.
    #[serde(default)]
    pub rs1_val: u64,
    /// Value of `rs2`.
    #[serde(default)]
    pub rs2_val: u64,
}

impl TraceRecord {
    /// Parses one trace line.
    ///
    /// # Arguments
    ///
    /// * `text` - The JSON object.
    /// * `line` - One-based line number, used in errors.
    pub fn parse(text: &str, line: usize) -> Result<Self, TraceError> {
        let record: Self =
            serde_json::from_str(text).map_err(|source| TraceError::Record { line, source })?;
        for register in [record.rs1, record.rs2, record.rd].into_iter().flatten() {
            if register > MAX_REGISTER {
                return Err(TraceError::Register { line, register });
            }
        }
        Ok(record)
    }

    /// Copies the record into an allocated instruction.
    pub fn apply(&self, inst: &mut Instruction) {
        let register = |reg: Option<RegNum>| reg.unwrap_or(REGISTER_NOT_USED);
        let _ = inst
            .set_addr(self.pc)
            .set_opcode(self.op)
            .set_r_type(register(self.rs2), register(self.rs1), register(self.rd))
            .set_ls_addr(self.ls_addr)
            .set_target_addr(self.target)
            .set_taken(self.taken)
            .set_operand_values(self.rs1_val, self.rs2_val);
    }
}

/// Iterator over the records of a trace.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Reads records from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(err) => return Some(Err(err.into())),
            };
            self.line += 1;
            let text = text.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            return Some(TraceRecord::parse(text, self.line));
        }
    }
}
