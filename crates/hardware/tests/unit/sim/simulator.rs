//! Simulator Context Tests.
//!
//! The driver-facing surface: describing and submitting instructions,
//! replaying traces and collecting reports.

use std::io::Cursor;

use pretty_assertions::assert_eq;
use rvperf_core::Simulator;
use rvperf_core::common::{ConfigError, TraceError};
use rvperf_core::config::Config;
use rvperf_core::isa::Opcode;

use crate::common::builder::{alu, branch, load, store};
use crate::common::harness::{TestContext, ideal_config};

#[test]
fn invalid_config_is_rejected() {
    let mut config = Config::default();
    config.cache.l1_d.sets = 3;

    assert!(matches!(
        Simulator::new(&config),
        Err(ConfigError::NotPowerOfTwo { .. })
    ));
}

#[test]
fn describe_and_submit() {
    let mut sim = Simulator::new(&ideal_config()).unwrap();
    let ticket = sim.create_instruction();
    let _ = sim
        .instruction_mut(ticket)
        .set_addr(0x100)
        .set_opcode(Opcode::Addi)
        .set_i_type(1, 2);

    assert_eq!(sim.instruction(ticket).addr, 0x100);
    assert_eq!(sim.submit(ticket), 1);
    assert_eq!(sim.pipeline().instruction_count(), 1);
    assert_eq!(sim.report_performance().cycles, 5);
}

#[test]
fn separate_simulators_do_not_share_state() {
    let mut first = TestContext::ideal();
    let second = TestContext::ideal();
    let _ = first.run(&[alu(0x0, 1, 2, 3), alu(0x4, 4, 5, 6)]);

    assert_eq!(first.cycles(), 6);
    assert_eq!(second.cycles(), 0);
}

#[test]
fn run_trace_replays_every_record() {
    let trace = r#"
# load-use pair then a loop branch
{"pc": 4096, "op": "ld", "rs1": 2, "rd": 5, "ls_addr": 8192}
{"pc": 4100, "op": "add", "rs1": 5, "rs2": 6, "rd": 7}
{"pc": 4104, "op": "addi", "rs1": 7, "rd": 7}
{"pc": 4108, "op": "addi", "rs1": 1, "rd": 1}
"#;
    let mut ctx = TestContext::ideal();
    let replayed = ctx.sim.run_trace(Cursor::new(trace)).unwrap();

    assert_eq!(replayed, 4);
    assert_eq!(ctx.cycles(), 4 + 1 + 4);
}

#[test]
fn run_trace_stops_at_the_first_bad_line() {
    let trace = "{\"pc\": 0, \"op\": \"add\"}\n{\"pc\": 4, \"op\": \"add\"}\nnot json\n{\"pc\": 8, \"op\": \"add\"}\n";
    let mut ctx = TestContext::ideal();

    match ctx.sim.run_trace(Cursor::new(trace)) {
        Err(TraceError::Record { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected a record error, got {other:?}"),
    }
    assert_eq!(ctx.instructions(), 2);
}

#[test]
fn cache_report_lists_each_level() {
    let mut ctx = TestContext::new();
    let _ = ctx.run(&[
        store(0x1000, 5, 2, 0x8000),
        load(0x1004, 6, 2, 0x8000),
        alu(0x1008, 7, 1, 2),
        alu(0x100c, 8, 1, 2),
        alu(0x1010, 9, 1, 2),
        alu(0x1014, 10, 1, 2),
    ]);

    let caches = ctx.sim.report_cache_stats();
    let names: Vec<_> = caches.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["L1-I", "L1-D", "L2"]);

    let l1_i = &caches[0];
    assert_eq!((l1_i.reads, l1_i.read_misses), (6, 1));

    let l1_d = &caches[1];
    assert_eq!((l1_d.writes, l1_d.write_misses), (1, 1));
    assert_eq!((l1_d.reads, l1_d.read_misses), (1, 0));

    let l2 = &caches[2];
    assert_eq!(l2.accesses, 2);
}

#[test]
fn branch_report_follows_the_predictor() {
    let mut ctx = TestContext::ideal();
    for i in 0..4 {
        let _ = ctx.run(&[
            alu(0x100, 5, 1, 2),
            alu(0x104, 6, 1, 2),
            branch(0x108, i < 3, 0x100),
        ]);
    }
    let _ = ctx.run(&[alu(0x10c, 7, 1, 2), alu(0x110, 8, 1, 2)]);

    let report = ctx.sim.report_branch_stats();
    assert_eq!(report.stats.verified, 4);
    assert_eq!(report.mispredictions, 2);
    assert_eq!(report.latency, 4);
    assert_eq!(report.overall_accuracy, 50.0);
}

#[test]
fn full_report_serializes() {
    let mut ctx = TestContext::ideal();
    let _ = ctx.run(&[alu(0x0, 1, 2, 3)]);

    let json = serde_json::to_value(ctx.sim.report()).unwrap();
    assert_eq!(json["performance"]["instructions"], 1);
    assert_eq!(json["performance"]["cycles"], 5);
    assert_eq!(json["caches"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["branch"]["predictions"], 0);
}
