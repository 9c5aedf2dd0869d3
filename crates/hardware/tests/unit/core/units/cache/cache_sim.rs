//! Set-Associative Cache Tests.
//!
//! A 4-set, 2-way cache of 64-byte lines. Addresses 0x1000, 0x1100 and 0x1200
//! all map to set 0 with different tags. Only hits update the replacement tree,
//! so a fresh set keeps evicting way 0 until one of its lines is reused.

use pretty_assertions::assert_eq;
use rvperf_core::config::CacheConfig;
use rvperf_core::core::units::cache::{CacheStats, Lookup, SetAssociativeCache};

fn small_cache() -> SetAssociativeCache {
    SetAssociativeCache::new(&CacheConfig::new(4, 2, 64, 1))
}

#[test]
fn geometry() {
    let cache = small_cache();
    assert_eq!(cache.num_sets(), 4);
    assert_eq!(cache.ways(), 2);
    assert_eq!(cache.hit_latency(), 1);
    assert_eq!(*cache.stats(), CacheStats::default());
}

#[test]
fn cold_miss_then_hit() {
    let mut cache = small_cache();

    assert_eq!(cache.lookup(0x1000, false), Lookup::Miss { writeback: None });
    assert!(cache.contains(0x1000));
    assert_eq!(cache.lookup(0x1000, false), Lookup::Hit);
    // Same line, different offset.
    assert_eq!(cache.lookup(0x103f, false), Lookup::Hit);

    let stats = cache.stats();
    assert_eq!((stats.reads, stats.read_misses), (3, 1));
    assert_eq!(stats.hits(), 2);
}

#[test]
fn neighbouring_line_is_a_separate_miss() {
    let mut cache = small_cache();
    let _ = cache.lookup(0x1000, false);
    assert_eq!(cache.lookup(0x1040, false), Lookup::Miss { writeback: None });
}

#[test]
fn write_allocates_a_dirty_line() {
    let mut cache = small_cache();

    assert_eq!(cache.lookup(0x1000, true), Lookup::Miss { writeback: None });
    assert!(cache.is_dirty(0x1000));
    assert_eq!(cache.stats().write_misses, 1);
}

#[test]
fn write_hit_marks_dirty() {
    let mut cache = small_cache();
    let _ = cache.lookup(0x1000, false);
    assert!(!cache.is_dirty(0x1000));

    assert_eq!(cache.lookup(0x1000, true), Lookup::Hit);
    assert!(cache.is_dirty(0x1000));
}

#[test]
fn dirty_victim_is_written_back_at_its_line_address() {
    let mut cache = small_cache();
    let _ = cache.lookup(0x1008, true);

    assert_eq!(cache.lookup(0x1100, false), Lookup::Miss { writeback: Some(0x1000) });
    assert!(!cache.contains(0x1000));
    assert!(cache.contains(0x1100));
    assert_eq!(cache.stats().writebacks, 1);
}

#[test]
fn clean_victim_is_dropped() {
    let mut cache = small_cache();
    let _ = cache.lookup(0x1000, false);

    assert_eq!(cache.lookup(0x1100, false), Lookup::Miss { writeback: None });
    assert_eq!(cache.stats().writebacks, 0);
}

/// Installing a line leaves the tree alone, so back-to-back misses keep
/// landing in the same way.
#[test]
fn misses_alone_keep_replacing_the_same_way() {
    let mut cache: SetAssociativeCache = SetAssociativeCache::new(&CacheConfig::new(1, 2, 64, 0));

    let _ = cache.lookup(0x1000, false);
    let _ = cache.lookup(0x1040, false);
    assert_eq!(cache.lookup(0x1000, false), Lookup::Miss { writeback: None });

    assert!(!cache.contains(0x1040));
    assert_eq!(cache.stats().misses(), 3);
}

#[test]
fn hit_protects_a_line_from_eviction() {
    let mut cache = small_cache();
    let _ = cache.lookup(0x1000, false);
    assert_eq!(cache.lookup(0x1000, false), Lookup::Hit);

    let _ = cache.lookup(0x1100, false);
    let _ = cache.lookup(0x1200, false);

    assert!(cache.contains(0x1000));
    assert!(!cache.contains(0x1100));
    assert!(cache.contains(0x1200));
    assert_eq!(cache.stats().misses(), 3);
}

#[test]
fn contains_does_not_count_as_an_access() {
    let mut cache = small_cache();
    let _ = cache.lookup(0x1000, false);
    let before = *cache.stats();

    assert!(cache.contains(0x1000));
    assert!(!cache.contains(0x2000));
    assert_eq!(*cache.stats(), before);
}

#[test]
fn full_set_fits_its_associativity() {
    let mut cache: SetAssociativeCache = SetAssociativeCache::new(&CacheConfig::new(1, 4, 64, 0));
    // A hit after each fill steers the next victim to an untouched way.
    for line in 0..4u64 {
        let _ = cache.lookup(line * 64, false);
        assert_eq!(cache.lookup(line * 64, false), Lookup::Hit, "line {line}");
    }
    for line in 0..4u64 {
        assert!(cache.contains(line * 64), "line {line}");
    }
    assert_eq!(cache.stats().misses(), 4);
}
