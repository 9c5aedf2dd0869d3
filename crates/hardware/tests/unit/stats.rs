//! Report Metric Tests.

use pretty_assertions::assert_eq;
use rvperf_core::core::units::bru::BranchStats;
use rvperf_core::core::units::cache::CacheStats;
use rvperf_core::stats::{BranchReport, CacheReport, PerformanceReport};

use crate::common::builder::{alu, load};
use crate::common::harness::TestContext;

#[test]
fn cache_rates() {
    let stats = CacheStats {
        reads: 80,
        read_misses: 8,
        writes: 20,
        write_misses: 12,
        writebacks: 5,
    };
    let report = CacheReport::new("L1-D", &stats);

    assert_eq!(report.accesses, 100);
    assert_eq!(report.hits, 80);
    assert_eq!(report.misses, 20);
    assert_eq!(report.miss_rate, 20.0);
    assert_eq!(report.read_miss_rate, 10.0);
    assert_eq!(report.write_miss_rate, 60.0);
    assert_eq!(report.writeback_rate, 25.0);
}

#[test]
fn idle_cache_reports_zero_rates() {
    let report = CacheReport::new("L2", &CacheStats::default());
    assert_eq!(report.miss_rate, 0.0);
    assert_eq!(report.writeback_rate, 0.0);
}

#[test]
fn branch_accuracies() {
    let stats = BranchStats {
        predictions: 10,
        verified: 10,
        predicted_taken: 6,
        btb_hits: 4,
        btb_hit_correct_target: 3,
        btb_hit_wrong_target: 1,
        btb_hit_wrong_direction: 0,
        btb_miss_taken: 1,
        btb_miss_not_taken: 1,
        not_taken_correct: 3,
        not_taken_incorrect: 1,
    };
    let report = BranchReport::new(stats, 6);

    assert_eq!(report.mispredictions, 3);
    assert_eq!(report.direction_accuracy, 80.0);
    assert_eq!(report.overall_accuracy, 60.0);
    assert_eq!(report.target_accuracy, 75.0);
    assert_eq!(report.latency, 6);
    assert!((report.btb_hit_rate - 200.0 / 3.0).abs() < 1e-9);
}

#[test]
fn empty_run_has_zero_cpi() {
    let ctx = TestContext::ideal();
    let report = PerformanceReport::from_pipeline(ctx.sim.pipeline());

    assert_eq!(report.instructions, 0);
    assert_eq!(report.cycles, 0);
    assert_eq!(report.cpi, 0.0);
}

#[test]
fn latency_breakdown() {
    let mut ctx = TestContext::new();
    let _ = ctx.run(&[
        load(0x1000, 5, 2, 0x8000),
        alu(0x1004, 6, 5, 5),
        alu(0x1008, 7, 1, 2),
        alu(0x100c, 8, 1, 2),
    ]);
    let report = ctx.sim.report_performance();

    // One I-cache miss and one D-cache miss, each L2 miss plus memory.
    assert_eq!(report.cache_latency, 14 + 14);
    assert_eq!(report.hazard_latency, 1);
    assert_eq!(report.branch_latency, 0);
    assert_eq!(report.cycles, 5 + 28 + 4);
    assert_eq!(report.share(report.hazard_latency), 100.0 / 37.0);
}
