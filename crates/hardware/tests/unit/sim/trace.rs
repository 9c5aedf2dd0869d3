//! Trace Parsing Tests.

use std::io::Cursor;

use pretty_assertions::assert_eq;
use rvperf_core::common::{REGISTER_NOT_USED, TraceError};
use rvperf_core::isa::{Instruction, Opcode};
use rvperf_core::sim::{TraceReader, TraceRecord};

#[test]
fn minimal_record() {
    let record = TraceRecord::parse(r#"{"pc": 4096, "op": "addi", "rs1": 2, "rd": 5}"#, 1).unwrap();

    assert_eq!(record.pc, 0x1000);
    assert_eq!(record.op, Opcode::Addi);
    assert_eq!(record.rs1, Some(2));
    assert_eq!(record.rs2, None);
    assert_eq!(record.rd, Some(5));
    assert!(!record.taken);
}

#[test]
fn full_branch_record() {
    let text = r#"{"pc": 8, "op": "bne", "rs1": 1, "rs2": 2, "taken": true, "target": 64, "rs1_val": 3, "rs2_val": 4}"#;
    let record = TraceRecord::parse(text, 1).unwrap();

    assert_eq!(record.op, Opcode::Bne);
    assert!(record.taken);
    assert_eq!(record.target, 64);
    assert_eq!((record.rs1_val, record.rs2_val), (3, 4));
}

#[test]
fn missing_op_reports_the_line() {
    match TraceRecord::parse(r#"{"pc": 0}"#, 7) {
        Err(TraceError::Record { line, .. }) => assert_eq!(line, 7),
        other => panic!("expected a record error, got {other:?}"),
    }
}

#[test]
fn unknown_mnemonic_is_rejected() {
    let result = TraceRecord::parse(r#"{"pc": 0, "op": "vadd"}"#, 2);
    assert!(matches!(result, Err(TraceError::Record { line: 2, .. })));
}

#[test]
fn register_out_of_range_is_rejected() {
    match TraceRecord::parse(r#"{"pc": 0, "op": "add", "rs1": 1, "rs2": 32, "rd": 3}"#, 4) {
        Err(TraceError::Register { line, register }) => assert_eq!((line, register), (4, 32)),
        other => panic!("expected a register error, got {other:?}"),
    }
}

#[test]
fn apply_fills_an_instruction() {
    let record = TraceRecord::parse(
        r#"{"pc": 4096, "op": "ld", "rs1": 2, "rd": 5, "ls_addr": 8192}"#,
        1,
    )
    .unwrap();
    let mut inst = Instruction::default();
    record.apply(&mut inst);

    assert_eq!(inst.addr, 0x1000);
    assert_eq!(inst.opcode, Opcode::Ld);
    assert_eq!(inst.ls_addr, 0x2000);
    assert_eq!((inst.rs1, inst.rs2, inst.rd), (2, REGISTER_NOT_USED, 5));
    assert!(inst.is_load());
}

#[test]
fn reader_skips_blank_lines_and_comments() {
    let trace = "# warm-up\n\n{\"pc\": 0, \"op\": \"add\"}\n   \n{\"pc\": 4, \"op\": \"sub\"}\n";
    let records: Vec<_> = TraceReader::new(Cursor::new(trace))
        .collect::<Result<_, _>>()
        .unwrap();

    let ops: Vec<_> = records.iter().map(|r| r.op).collect();
    assert_eq!(ops, [Opcode::Add, Opcode::Sub]);
}

#[test]
fn reader_counts_skipped_lines() {
    let trace = "# header\n{\"pc\": 0, \"op\": \"add\"}\n\n{\"pc\": 4, \"op\": \"bogus\"}\n";
    let results: Vec<_> = TraceReader::new(Cursor::new(trace)).collect();

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(TraceError::Record { line: 4, .. })));
}

#[test]
fn empty_trace_has_no_records() {
    assert_eq!(TraceReader::new(Cursor::new("")).count(), 0);
}
