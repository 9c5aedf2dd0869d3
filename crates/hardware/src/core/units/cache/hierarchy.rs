//! Memory hierarchy.
//!
//! Levels live in one arena and refer to their next level by [`LevelId`]. A
//! level is either a [`SetAssociativeCache`] or the [`MainMemory`] that ends the
//! chain. An access that misses a cache recurses to the next level:
//! 1. **Write-back:** A dirty victim is written to the next level first.
//! 2. **Refill:** The missing line is read from the next level, and that read's
//!    latency is added to this level's hit latency.
//!
//! Only the refill is on the critical path; write-backs are counted at the next
//! level but cost the requester nothing. Levels that face the pipeline carry a
//! stall policy that charges the full access latency to the clock.

use tracing::debug;

use super::{Lookup, SetAssociativeCache};
use crate::common::Cycles;
use crate::config::{CacheConfig, CacheHierarchyConfig};
use crate::core::clock::CycleCounter;
use crate::core::timing::{LatencyLog, SkippedStallCycles, StallPolicy};

/// Handle to one level of a [`MemoryHierarchy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LevelId(usize);

/// Fixed-latency backing store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MainMemory {
    latency: Cycles,
    reads: u64,
    writes: u64,
}

impl MainMemory {
    /// Creates a backing store answering every access in `latency` cycles.
    pub const fn new(latency: Cycles) -> Self {
        Self {
            latency,
            reads: 0,
            writes: 0,
        }
    }

    /// Serves one access.
    pub const fn access(&mut self, is_write: bool) -> Cycles {
        if is_write {
            self.writes += 1;
        } else {
            self.reads += 1;
        }
        self.latency
    }

    /// Access latency.
    pub const fn latency(&self) -> Cycles {
        self.latency
    }

    /// Reads served.
    pub const fn reads(&self) -> u64 {
        self.reads
    }

    /// Writes served.
    pub const fn writes(&self) -> u64 {
        self.writes
    }
}

#[derive(Debug)]
enum Storage {
    Cache(SetAssociativeCache),
    Memory(MainMemory),
}

#[derive(Debug)]
struct Level {
    name: String,
    storage: Storage,
    next: Option<LevelId>,
    stall: Option<Box<dyn StallPolicy>>,
    latency: LatencyLog,
}

/// Level handles of the standard split-L1 hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HierarchyPorts {
    /// L1 instruction cache, used by fetch.
    pub l1_i: LevelId,
    /// L1 data cache, used by the memory stage.
    pub l1_d: LevelId,
    /// Unified L2 behind both L1 caches.
    pub l2: LevelId,
    /// Backing memory behind the L2.
    pub memory: LevelId,
}

/// An arena of cache levels and a backing memory.
#[derive(Debug, Default)]
pub struct MemoryHierarchy {
    levels: Vec<Level>,
}

impl MemoryHierarchy {
    /// Creates an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds L1-I and L1-D over a shared L2 over memory.
    ///
    /// Both L1 caches charge their access latency to the clock behind `counter`.
    ///
    /// # Returns
    ///
    /// The hierarchy and the handles of its four levels.
    pub fn split_l1(config: &CacheHierarchyConfig, counter: &CycleCounter) -> (Self, HierarchyPorts) {
        let mut hierarchy = Self::new();
        let memory = hierarchy.add_memory("Memory", config.memory_latency);
        let l2 = hierarchy.add_cache("L2", &config.l2, Some(memory));
        let l1_i = hierarchy.add_cache("L1-I", &config.l1_i, Some(l2));
        let l1_d = hierarchy.add_cache("L1-D", &config.l1_d, Some(l2));
        for l1 in [l1_i, l1_d] {
            hierarchy.set_stall_policy(l1, Box::new(SkippedStallCycles::new(counter.clone())));
        }
        (
            hierarchy,
            HierarchyPorts {
                l1_i,
                l1_d,
                l2,
                memory,
            },
        )
    }

    fn push(&mut self, name: &str, storage: Storage, next: Option<LevelId>) -> LevelId {
        if let Some(next) = next {
            assert!(next.0 < self.levels.len(), "next level {next:?} does not exist yet");
        }
        self.levels.push(Level {
            name: name.to_string(),
            storage,
            next,
            stall: None,
            latency: LatencyLog::default(),
        });
        LevelId(self.levels.len() - 1)
    }

    /// Adds a cache in front of `next`.
    ///
    /// A level can only point at a level added before it, so the chain always
    /// ends and never loops.
    ///
    /// # Arguments
    ///
    /// * `name` - Label used in reports.
    /// * `config` - Geometry and hit latency.
    /// * `next` - The level misses are served from, or `None` for a terminal cache.
    pub fn add_cache(&mut self, name: &str, config: &CacheConfig, next: Option<LevelId>) -> LevelId {
        self.push(name, Storage::Cache(SetAssociativeCache::new(config)), next)
    }

    /// Adds a fixed-latency backing memory.
    pub fn add_memory(&mut self, name: &str, latency: Cycles) -> LevelId {
        self.push(name, Storage::Memory(MainMemory::new(latency)), None)
    }

    /// Makes `level` charge every access's latency through `policy`.
    pub fn set_stall_policy(&mut self, level: LevelId, policy: Box<dyn StallPolicy>) {
        self.levels[level.0].stall = Some(policy);
    }

    /// Accesses `addr` at `level`, recursing into lower levels on a miss.
    ///
    /// # Arguments
    ///
    /// * `level` - The level the request enters at.
    /// * `addr` - The byte address accessed.
    /// * `is_write` - Whether the access is a store.
    ///
    /// # Returns
    ///
    /// The latency of the access in cycles.
    pub fn access(&mut self, level: LevelId, addr: u64, is_write: bool) -> Cycles {
        let next = self.levels[level.0].next;
        let cycles = match &mut self.levels[level.0].storage {
            Storage::Memory(memory) => memory.access(is_write),
            Storage::Cache(cache) => {
                let hit_latency = cache.hit_latency();
                match cache.lookup(addr, is_write) {
                    Lookup::Hit => hit_latency,
                    Lookup::Miss { writeback } => self.refill(level, next, addr, writeback) + hit_latency,
                }
            }
        };

        let entry = &mut self.levels[level.0];
        entry.latency.update(cycles);
        if let Some(policy) = &entry.stall {
            policy.stall(cycles);
        }
        cycles
    }

    fn refill(&mut self, level: LevelId, next: Option<LevelId>, addr: u64, writeback: Option<u64>) -> Cycles {
        let Some(next) = next else {
            return 0;
        };
        if let Some(victim) = writeback {
            debug!(level = %self.levels[level.0].name, victim, "dirty write-back");
            let _ = self.access(next, victim, true);
        }
        self.access(next, addr, false)
    }

    /// The cache at `level`, or `None` for the backing memory.
    pub fn cache(&self, level: LevelId) -> Option<&SetAssociativeCache> {
        match &self.levels[level.0].storage {
            Storage::Cache(cache) => Some(cache),
            Storage::Memory(_) => None,
        }
    }

    /// The backing memory at `level`, or `None` for a cache.
    pub fn memory(&self, level: LevelId) -> Option<&MainMemory> {
        match &self.levels[level.0].storage {
            Storage::Memory(memory) => Some(memory),
            Storage::Cache(_) => None,
        }
    }

    /// Report label of `level`.
    pub fn name(&self, level: LevelId) -> &str {
        &self.levels[level.0].name
    }

    /// Cycles returned by every access entering or reaching `level`.
    pub fn latency(&self, level: LevelId) -> &LatencyLog {
        &self.levels[level.0].latency
    }
}
