//! Set-Associative Cache Model.
//!
//! This module implements the timing side of a write-back, write-allocate
//! set-associative cache. It provides:
//! 1. **Lookup:** Tag match within one set, with replacement-policy touch on hit.
//! 2. **Refill:** Victim selection, dirty write-back detection and line install on miss.
//! 3. **Hierarchy:** Chaining of caches down to a fixed-latency backing memory.
//!
//! Caches hold no data. A line is a single tag word with the valid and dirty
//! flags packed into its low bits, which are always zero in a tag because the
//! tag keeps the address bits above the set index.

/// Cache levels chained to a backing memory.
pub mod hierarchy;

/// Replacement policy implementations.
pub mod policies;

use serde::Serialize;
use tracing::trace;

use self::policies::{ReplacementPolicy, TreePlru};
use crate::common::Cycles;
use crate::config::CacheConfig;

pub use hierarchy::{HierarchyPorts, LevelId, MainMemory, MemoryHierarchy};

const VALID: u64 = 1 << 0;
const DIRTY: u64 = 1 << 1;

/// Tag word with packed valid and dirty flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct CacheLine(u64);

impl CacheLine {
    const fn new(tag: u64, dirty: bool) -> Self {
        Self(tag | VALID | if dirty { DIRTY } else { 0 })
    }

    const fn is_valid(self) -> bool {
        self.0 & VALID != 0
    }

    const fn is_dirty(self) -> bool {
        self.0 & DIRTY != 0
    }

    const fn tag(self) -> u64 {
        self.0 & !(VALID | DIRTY)
    }

    const fn mark_dirty(&mut self) {
        self.0 |= DIRTY;
    }
}

/// Outcome of a single cache lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// The line was present.
    Hit,
    /// The line was absent and has been installed.
    Miss {
        /// Line address of a dirty victim that must be written to the next level.
        writeback: Option<u64>,
    },
}

/// Access counters of one cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Read lookups.
    pub reads: u64,
    /// Read lookups that missed.
    pub read_misses: u64,
    /// Write lookups.
    pub writes: u64,
    /// Write lookups that missed.
    pub write_misses: u64,
    /// Dirty victims written back to the next level.
    pub writebacks: u64,
}

impl CacheStats {
    /// All lookups.
    pub const fn accesses(&self) -> u64 {
        self.reads + self.writes
    }

    /// All misses.
    pub const fn misses(&self) -> u64 {
        self.read_misses + self.write_misses
    }

    /// All hits.
    pub const fn hits(&self) -> u64 {
        self.accesses() - self.misses()
    }
}

/// A set-associative, write-back, write-allocate cache.
///
/// Generic over its replacement policy; the model uses [`TreePlru`].
#[derive(Clone, Debug)]
pub struct SetAssociativeCache<R = TreePlru> {
    lines: Vec<CacheLine>,
    num_sets: usize,
    ways: usize,
    offset_bits: u32,
    index_bits: u32,
    hit_latency: Cycles,
    policy: R,
    stats: CacheStats,
}

impl<R: ReplacementPolicy> SetAssociativeCache<R> {
    /// Creates an empty cache.
    ///
    /// # Arguments
    ///
    /// * `config` - Geometry and hit latency. Sets, ways and line size must be
    ///   powers of two (see [`crate::config::Config::validate`]).
    pub fn new(config: &CacheConfig) -> Self {
        assert!(
            config.sets.is_power_of_two()
                && config.ways.is_power_of_two()
                && config.line_bytes.is_power_of_two()
                && config.line_bytes >= 4,
            "invalid cache geometry {config:?}"
        );
        Self {
            lines: vec![CacheLine::default(); config.sets * config.ways],
            num_sets: config.sets,
            ways: config.ways,
            offset_bits: config.line_bytes.trailing_zeros(),
            index_bits: config.sets.trailing_zeros(),
            hit_latency: config.hit_latency,
            policy: R::new(config.sets, config.ways),
            stats: CacheStats::default(),
        }
    }

    /// Latency of a hit in cycles.
    pub const fn hit_latency(&self) -> Cycles {
        self.hit_latency
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Number of ways per set.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Access counters.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn set_index(&self, addr: u64) -> usize {
        ((addr >> self.offset_bits) as usize) & (self.num_sets - 1)
    }

    fn tag(&self, addr: u64) -> u64 {
        let low_bits = self.offset_bits + self.index_bits;
        if low_bits >= u64::BITS {
            0
        } else {
            addr & !((1u64 << low_bits) - 1)
        }
    }

    /// Line address of the block held with `tag` in `set`.
    fn line_addr(&self, tag: u64, set: usize) -> u64 {
        tag | ((set as u64) << self.offset_bits)
    }

    fn find(&self, set: usize, tag: u64) -> Option<usize> {
        let base = set * self.ways;
        self.lines[base..base + self.ways]
            .iter()
            .position(|line| line.is_valid() && line.tag() == tag)
    }

    /// Checks whether `addr` is cached without touching any state.
    pub fn contains(&self, addr: u64) -> bool {
        self.find(self.set_index(addr), self.tag(addr)).is_some()
    }

    /// Checks whether the line holding `addr` is cached and dirty.
    pub fn is_dirty(&self, addr: u64) -> bool {
        let set = self.set_index(addr);
        self.find(set, self.tag(addr))
            .is_some_and(|way| self.lines[set * self.ways + way].is_dirty())
    }

    /// Looks up `addr`, updating the replacement state and counters.
    ///
    /// A hit touches the way and marks it dirty on a write. A miss evicts the
    /// policy's victim and installs the new line (dirty on a write) without
    /// touching it: only hits steer the replacement tree. The next level is not
    /// consulted here; see [`MemoryHierarchy::access`].
    ///
    /// # Arguments
    ///
    /// * `addr` - The byte address accessed.
    /// * `is_write` - Whether the access is a store.
    ///
    /// # Returns
    ///
    /// [`Lookup::Hit`], or [`Lookup::Miss`] with the line address of a dirty victim.
    pub fn lookup(&mut self, addr: u64, is_write: bool) -> Lookup {
        let set = self.set_index(addr);
        let tag = self.tag(addr);
        let base = set * self.ways;

        if is_write {
            self.stats.writes += 1;
        } else {
            self.stats.reads += 1;
        }

        if let Some(way) = self.find(set, tag) {
            self.policy.update(set, way);
            if is_write {
                self.lines[base + way].mark_dirty();
            }
            trace!(addr, set, way, "cache hit");
            return Lookup::Hit;
        }

        if is_write {
            self.stats.write_misses += 1;
        } else {
            self.stats.read_misses += 1;
        }

        let way = self.policy.get_victim(set);
        let victim = self.lines[base + way];
        let writeback = if victim.is_valid() && victim.is_dirty() {
            self.stats.writebacks += 1;
            Some(self.line_addr(victim.tag(), set))
        } else {
            None
        };

        self.lines[base + way] = CacheLine::new(tag, is_write);
        trace!(addr, set, way, ?writeback, "cache miss");

        Lookup::Miss { writeback }
    }
}
