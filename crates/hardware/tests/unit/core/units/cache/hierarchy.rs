//! Memory Hierarchy Tests.
//!
//! Latency composition across levels, write-back traffic and stall charging.

use pretty_assertions::assert_eq;
use rvperf_core::config::{CacheConfig, CacheHierarchyConfig};
use rvperf_core::core::CycleCounter;
use rvperf_core::core::timing::SkippedStallCycles;
use rvperf_core::core::units::cache::{LevelId, MemoryHierarchy};

/// L1 (4 sets x 2 ways, hit 1) over L2 (16 sets x 4 ways, hit 4) over memory (10).
fn two_level() -> (MemoryHierarchy, LevelId, LevelId, LevelId) {
    let mut hierarchy = MemoryHierarchy::new();
    let memory = hierarchy.add_memory("Memory", 10);
    let l2 = hierarchy.add_cache("L2", &CacheConfig::new(16, 4, 64, 4), Some(memory));
    let l1 = hierarchy.add_cache("L1", &CacheConfig::new(4, 2, 64, 1), Some(l2));
    (hierarchy, l1, l2, memory)
}

#[test]
fn miss_latency_adds_up_the_levels() {
    let (mut hierarchy, l1, l2, memory) = two_level();

    assert_eq!(hierarchy.access(l1, 0x1000, false), 1 + 4 + 10);
    assert_eq!(hierarchy.access(l1, 0x1000, false), 1);

    assert_eq!(hierarchy.cache(l2).map(|c| c.stats().reads), Some(1));
    assert_eq!(hierarchy.memory(memory).map(|m| m.reads()), Some(1));
}

#[test]
fn l2_hit_skips_memory() {
    let (mut hierarchy, l1, _, memory) = two_level();
    let _ = hierarchy.access(l1, 0x1000, false);
    // Same L1 set: evicts 0x1000 from L1, while L2 keeps both.
    let _ = hierarchy.access(l1, 0x1100, false);

    assert_eq!(hierarchy.access(l1, 0x1000, false), 1 + 4);
    assert_eq!(hierarchy.memory(memory).map(|m| m.reads()), Some(2));
}

#[test]
fn dirty_eviction_writes_once_to_the_next_level() {
    let (mut hierarchy, l1, l2, memory) = two_level();
    let _ = hierarchy.access(l1, 0x1000, true);

    // Evicts the dirty 0x1000. The write-back itself is not charged to the access.
    assert_eq!(hierarchy.access(l1, 0x1100, false), 1 + 4 + 10);

    let l2_stats = *hierarchy.cache(l2).map(|c| c.stats()).unwrap();
    assert_eq!(l2_stats.writes, 1);
    assert_eq!(l2_stats.reads, 2);
    assert!(hierarchy.cache(l2).unwrap().is_dirty(0x1000));
    assert_eq!(hierarchy.memory(memory).map(|m| m.writes()), Some(0));
}

#[test]
fn terminal_cache_misses_cost_only_its_hit_latency() {
    let mut hierarchy = MemoryHierarchy::new();
    let only = hierarchy.add_cache("L1", &CacheConfig::new(4, 2, 64, 3), None);

    assert_eq!(hierarchy.access(only, 0x40, false), 3);
    assert_eq!(hierarchy.memory(only).map(|m| m.reads()), None);
}

#[test]
fn latency_log_counts_every_access() {
    let (mut hierarchy, l1, l2, _) = two_level();
    let _ = hierarchy.access(l1, 0x1000, false);
    let _ = hierarchy.access(l1, 0x1000, false);

    assert_eq!(hierarchy.latency(l1).events(), 2);
    assert_eq!(hierarchy.latency(l1).total(), 15 + 1);
    assert_eq!(hierarchy.latency(l2).total(), 14);
    assert_eq!(hierarchy.name(l2), "L2");
}

#[test]
fn stall_policy_charges_the_clock() {
    let (mut hierarchy, l1, _, _) = two_level();
    let counter = CycleCounter::default();
    hierarchy.set_stall_policy(l1, Box::new(SkippedStallCycles::new(counter.clone())));

    let _ = hierarchy.access(l1, 0x1000, false);
    let _ = hierarchy.access(l1, 0x1000, false);

    assert_eq!(counter.get(), 15 + 1);
}

#[test]
fn split_l1_shares_the_l2() {
    let counter = CycleCounter::default();
    let (mut hierarchy, ports) = MemoryHierarchy::split_l1(&CacheHierarchyConfig::default(), &counter);

    // Instruction fetch brings the line into L2; the data side then hits there.
    assert_eq!(hierarchy.access(ports.l1_i, 0x4000, false), 4 + 10);
    assert_eq!(hierarchy.access(ports.l1_d, 0x4000, false), 4);
    assert_eq!(counter.get(), 14 + 4);

    assert_eq!(hierarchy.name(ports.l1_i), "L1-I");
    assert_eq!(hierarchy.name(ports.l1_d), "L1-D");
    assert_eq!(hierarchy.name(ports.memory), "Memory");
    assert_eq!(hierarchy.memory(ports.memory).map(|m| m.latency()), Some(10));
}

#[test]
#[should_panic(expected = "does not exist yet")]
fn next_level_must_already_exist() {
    let mut other = MemoryHierarchy::new();
    let foreign = other.add_memory("Memory", 10);

    let mut hierarchy = MemoryHierarchy::new();
    let _ = hierarchy.add_cache("L1", &CacheConfig::new(4, 2, 64, 1), Some(foreign));
}
