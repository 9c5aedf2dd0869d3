//! Trace record construction.

use rvperf_core::common::RegNum;
use rvperf_core::isa::Opcode;
use rvperf_core::sim::TraceRecord;

/// Fluent builder for a [`TraceRecord`].
#[derive(Debug)]
pub struct InstructionBuilder {
    record: TraceRecord,
}

impl InstructionBuilder {
    /// Starts a record for `op` with every other field defaulted.
    pub fn new(op: Opcode) -> Self {
        Self {
            record: TraceRecord {
                op,
                ..TraceRecord::default()
            },
        }
    }

    /// Sets the program counter.
    pub fn pc(mut self, pc: u64) -> Self {
        self.record.pc = pc;
        self
    }

    /// Sets the destination register.
    pub fn rd(mut self, rd: RegNum) -> Self {
        self.record.rd = Some(rd);
        self
    }

    /// Sets the first source register.
    pub fn rs1(mut self, rs1: RegNum) -> Self {
        self.record.rs1 = Some(rs1);
        self
    }

    /// Sets the second source register.
    pub fn rs2(mut self, rs2: RegNum) -> Self {
        self.record.rs2 = Some(rs2);
        self
    }

    /// Sets the load/store address.
    pub fn ls_addr(mut self, addr: u64) -> Self {
        self.record.ls_addr = addr;
        self
    }

    /// Marks the branch taken to `target`.
    pub fn taken(mut self, target: u64) -> Self {
        self.record.taken = true;
        self.record.target = target;
        self
    }

    /// Marks the branch not taken; `target` is where it would have gone.
    pub fn not_taken(mut self, target: u64) -> Self {
        self.record.taken = false;
        self.record.target = target;
        self
    }

    /// Sets the operand values seen by the execution units.
    pub fn values(mut self, rs1_val: u64, rs2_val: u64) -> Self {
        self.record.rs1_val = rs1_val;
        self.record.rs2_val = rs2_val;
        self
    }

    /// Finishes the record.
    pub fn build(self) -> TraceRecord {
        self.record
    }
}

/// `add rd, rs1, rs2` at `pc`.
pub fn alu(pc: u64, rd: RegNum, rs1: RegNum, rs2: RegNum) -> TraceRecord {
    InstructionBuilder::new(Opcode::Add)
        .pc(pc)
        .rd(rd)
        .rs1(rs1)
        .rs2(rs2)
        .build()
}

/// `ld rd, 0(rs1)` at `pc` reading `addr`.
pub fn load(pc: u64, rd: RegNum, rs1: RegNum, addr: u64) -> TraceRecord {
    InstructionBuilder::new(Opcode::Ld)
        .pc(pc)
        .rd(rd)
        .rs1(rs1)
        .ls_addr(addr)
        .build()
}

/// `sd rs2, 0(rs1)` at `pc` writing `addr`.
pub fn store(pc: u64, rs2: RegNum, rs1: RegNum, addr: u64) -> TraceRecord {
    InstructionBuilder::new(Opcode::Sd)
        .pc(pc)
        .rs1(rs1)
        .rs2(rs2)
        .ls_addr(addr)
        .build()
}

/// `bne x1, x2` at `pc` resolving to `target` when `taken`.
pub fn branch(pc: u64, taken: bool, target: u64) -> TraceRecord {
    let builder = InstructionBuilder::new(Opcode::Bne).pc(pc).rs1(1).rs2(2);
    if taken {
        builder.taken(target).build()
    } else {
        builder.not_taken(target).build()
    }
}

/// `divu rd, rs1, rs2` at `pc` with the given operand values.
pub fn divide(pc: u64, dividend: u64, divisor: u64) -> TraceRecord {
    InstructionBuilder::new(Opcode::Divu)
        .pc(pc)
        .rd(10)
        .rs1(11)
        .rs2(12)
        .values(dividend, divisor)
        .build()
}
