//! Configuration system for the pipeline timing model.
//!
//! This module defines every structure used to parameterize the model. It provides:
//! 1. **Defaults:** The baseline machine (cache geometries, predictor tables, unit latencies).
//! 2. **Structures:** Hierarchical config for general, pipeline, cache, branch and execution settings.
//! 3. **Validation:** Checks that every size used for bit-mask indexing is a power of two.
//!
//! Configuration is supplied as JSON (every field is optional) or built with `Config::default()`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::constants::{MIN_POOL_CAPACITY, PIPELINE_FILL_LATENCY};
use crate::common::{ConfigError, Cycles};

/// Default configuration constants.
///
/// These values describe the reference machine when a field is not
/// explicitly overridden in a JSON configuration file.
mod defaults {
    use crate::common::Cycles;

    /// Instruction pool capacity (must exceed the pipeline's stages plus registers).
    pub const POOL_CAPACITY: usize = 16;

    /// L1 instruction cache: 128 sets.
    pub const L1_I_SETS: usize = 128;

    /// L1 instruction cache: 2-way set associative.
    pub const L1_I_WAYS: usize = 2;

    /// L1 data cache: 64 sets.
    pub const L1_D_SETS: usize = 64;

    /// L1 data cache: 4-way set associative.
    pub const L1_D_WAYS: usize = 4;

    /// L2 unified cache: 256 sets.
    pub const L2_SETS: usize = 256;

    /// L2 unified cache: 8-way set associative.
    pub const L2_WAYS: usize = 8;

    /// Line size shared by every cache level (64 bytes).
    pub const LINE_BYTES: usize = 64;

    /// L1 hit latency. An L1 hit is folded into the single pipeline cycle.
    pub const L1_HIT_LATENCY: Cycles = 0;

    /// L2 hit latency in cycles.
    pub const L2_HIT_LATENCY: Cycles = 4;

    /// Backing memory access latency in cycles.
    pub const MEMORY_LATENCY: Cycles = 10;

    /// Branch history table entries.
    pub const BHT_SIZE: usize = 64;

    /// Branch target buffer sets.
    pub const BTB_SETS: usize = 32;

    /// Branch target buffer ways.
    pub const BTB_WAYS: usize = 2;

    /// Cycles charged for every mispredicted branch.
    pub const MISPREDICT_PENALTY: Cycles = 2;

    /// Multiplier latency in cycles.
    pub const MUL_LATENCY: Cycles = 3;

    /// Divider base latency in cycles.
    pub const DIV_BASE_LATENCY: Cycles = 2;

    /// Largest associativity whose PLRU tree fits in one `u64` per set.
    pub const MAX_WAYS: usize = 64;

    /// Smallest line that leaves room for the valid and dirty flag bits.
    pub const MIN_LINE_BYTES: usize = 4;
}

/// Root configuration structure.
///
/// # Example (JSON)
///
/// Any subset of fields may be given; the rest keep their defaults.
///
/// ```
/// use rvperf_core::config::Config;
///
/// let json = r#"{
///     "general": { "trace_pipeline": true },
///     "cache": {
///         "l1_d": { "sets": 32, "ways": 8, "line_bytes": 32, "hit_latency": 1 },
///         "memory_latency": 100
///     },
///     "branch": { "bht_size": 1024 }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert!(config.general.trace_pipeline);
/// assert_eq!(config.cache.l1_d.ways, 8);
/// assert_eq!(config.cache.l1_i.ways, 2);
/// assert_eq!(config.cache.memory_latency, 100);
/// assert_eq!(config.branch.btb_sets, 32);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Instruction pool and pipeline drain settings
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Cache hierarchy configuration
    #[serde(default)]
    pub cache: CacheHierarchyConfig,
    /// Branch predictor configuration
    #[serde(default)]
    pub branch: BranchConfig,
    /// Execution unit latencies
    #[serde(default)]
    pub execution: ExecutionConfig,
}

impl Config {
    /// Parses a JSON configuration and validates it.
    ///
    /// # Arguments
    ///
    /// * `json` - The JSON document. Missing fields take their default values.
    ///
    /// # Returns
    ///
    /// The validated configuration, or the first parse or validation error.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks every structural constraint the model relies on.
    ///
    /// Set counts, way counts, line sizes and predictor table sizes are used as
    /// bit masks and must be powers of two. Ways are limited to 64 because each
    /// set's PLRU tree lives in one `u64`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cache.l1_i.validate("cache.l1_i")?;
        self.cache.l1_d.validate("cache.l1_d")?;
        self.cache.l2.validate("cache.l2")?;

        power_of_two("branch.bht_size", self.branch.bht_size)?;
        power_of_two("branch.btb_sets", self.branch.btb_sets)?;
        power_of_two("branch.btb_ways", self.branch.btb_ways)?;
        in_range(
            "branch.btb_ways",
            self.branch.btb_ways,
            1,
            defaults::MAX_WAYS,
        )?;

        in_range(
            "pipeline.pool_capacity",
            self.pipeline.pool_capacity,
            MIN_POOL_CAPACITY,
            u32::MAX as usize - 1,
        )
    }
}

fn power_of_two(field: &str, value: usize) -> Result<(), ConfigError> {
    if value.is_power_of_two() {
        Ok(())
    } else {
        Err(ConfigError::NotPowerOfTwo {
            field: field.to_string(),
            value,
        })
    }
}

fn in_range(field: &str, value: usize, min: usize, max: usize) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field: field.to_string(),
            value: value as u64,
            min: min as u64,
            max: max as u64,
        })
    }
}

/// General simulation settings and options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Emit a `debug` event with the occupancy of every pipeline register each cycle.
    #[serde(default)]
    pub trace_pipeline: bool,
}

/// Instruction pool and pipeline drain settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of instruction records in the circular pool
    #[serde(default = "PipelineConfig::default_pool_capacity")]
    pub pool_capacity: usize,

    /// Cycles added to the tick count to drain the last instruction
    #[serde(default = "PipelineConfig::default_fill_latency")]
    pub fill_latency: Cycles,
}

impl PipelineConfig {
    /// Returns the default pool capacity.
    fn default_pool_capacity() -> usize {
        defaults::POOL_CAPACITY
    }

    /// Returns the default drain latency (stages minus one).
    fn default_fill_latency() -> Cycles {
        PIPELINE_FILL_LATENCY
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pool_capacity: defaults::POOL_CAPACITY,
            fill_latency: PIPELINE_FILL_LATENCY,
        }
    }
}

/// Cache hierarchy configuration.
///
/// The hierarchy is fixed: split L1 instruction and data caches that both miss
/// into a unified L2, which misses into the backing memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheHierarchyConfig {
    /// L1 instruction cache
    #[serde(default = "CacheHierarchyConfig::default_l1_i")]
    pub l1_i: CacheConfig,
    /// L1 data cache
    #[serde(default = "CacheHierarchyConfig::default_l1_d")]
    pub l1_d: CacheConfig,
    /// Unified L2 cache
    #[serde(default = "CacheHierarchyConfig::default_l2")]
    pub l2: CacheConfig,
    /// Fixed latency of the backing memory in cycles
    #[serde(default = "CacheHierarchyConfig::default_memory_latency")]
    pub memory_latency: Cycles,
}

impl CacheHierarchyConfig {
    fn default_l1_i() -> CacheConfig {
        CacheConfig::new(
            defaults::L1_I_SETS,
            defaults::L1_I_WAYS,
            defaults::LINE_BYTES,
            defaults::L1_HIT_LATENCY,
        )
    }

    fn default_l1_d() -> CacheConfig {
        CacheConfig::new(
            defaults::L1_D_SETS,
            defaults::L1_D_WAYS,
            defaults::LINE_BYTES,
            defaults::L1_HIT_LATENCY,
        )
    }

    fn default_l2() -> CacheConfig {
        CacheConfig::new(
            defaults::L2_SETS,
            defaults::L2_WAYS,
            defaults::LINE_BYTES,
            defaults::L2_HIT_LATENCY,
        )
    }

    fn default_memory_latency() -> Cycles {
        defaults::MEMORY_LATENCY
    }
}

impl Default for CacheHierarchyConfig {
    fn default() -> Self {
        Self {
            l1_i: Self::default_l1_i(),
            l1_d: Self::default_l1_d(),
            l2: Self::default_l2(),
            memory_latency: defaults::MEMORY_LATENCY,
        }
    }
}

/// Configuration for a single set-associative cache.
///
/// Capacity is `sets * ways * line_bytes`. A level given in JSON must name its
/// full geometry; only `hit_latency` may be omitted (it defaults to 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Number of sets
    pub sets: usize,
    /// Associativity (number of ways)
    pub ways: usize,
    /// Cache line size in bytes
    pub line_bytes: usize,
    /// Latency of a hit in cycles
    #[serde(default)]
    pub hit_latency: Cycles,
}

impl CacheConfig {
    /// Creates a cache geometry.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets.
    /// * `ways` - The associativity.
    /// * `line_bytes` - The line size in bytes.
    /// * `hit_latency` - Cycles charged for a hit.
    pub const fn new(sets: usize, ways: usize, line_bytes: usize, hit_latency: Cycles) -> Self {
        Self {
            sets,
            ways,
            line_bytes,
            hit_latency,
        }
    }

    /// Total capacity in bytes.
    pub const fn size_bytes(&self) -> usize {
        self.sets * self.ways * self.line_bytes
    }

    /// Validates the geometry, naming errors after `section`.
    pub fn validate(&self, section: &str) -> Result<(), ConfigError> {
        let field = |name: &str| format!("{section}.{name}");

        power_of_two(&field("sets"), self.sets)?;
        power_of_two(&field("ways"), self.ways)?;
        power_of_two(&field("line_bytes"), self.line_bytes)?;
        in_range(&field("ways"), self.ways, 1, defaults::MAX_WAYS)?;
        in_range(
            &field("line_bytes"),
            self.line_bytes,
            defaults::MIN_LINE_BYTES,
            usize::MAX,
        )
    }
}

/// Branch predictor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchConfig {
    /// Number of 2-bit counters in the branch history table
    #[serde(default = "BranchConfig::default_bht_size")]
    pub bht_size: usize,
    /// Number of sets in the branch target buffer
    #[serde(default = "BranchConfig::default_btb_sets")]
    pub btb_sets: usize,
    /// Associativity of the branch target buffer
    #[serde(default = "BranchConfig::default_btb_ways")]
    pub btb_ways: usize,
    /// Cycles charged for a misprediction
    #[serde(default = "BranchConfig::default_mispredict_penalty")]
    pub mispredict_penalty: Cycles,
}

impl BranchConfig {
    fn default_bht_size() -> usize {
        defaults::BHT_SIZE
    }

    fn default_btb_sets() -> usize {
        defaults::BTB_SETS
    }

    fn default_btb_ways() -> usize {
        defaults::BTB_WAYS
    }

    fn default_mispredict_penalty() -> Cycles {
        defaults::MISPREDICT_PENALTY
    }
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            bht_size: defaults::BHT_SIZE,
            btb_sets: defaults::BTB_SETS,
            btb_ways: defaults::BTB_WAYS,
            mispredict_penalty: defaults::MISPREDICT_PENALTY,
        }
    }
}

/// Execution unit latencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Multiplier latency in cycles
    #[serde(default = "ExecutionConfig::default_mul_latency")]
    pub mul_latency: Cycles,
    /// Divider latency before the operand-dependent part
    #[serde(default = "ExecutionConfig::default_div_base_latency")]
    pub div_base_latency: Cycles,
}

impl ExecutionConfig {
    fn default_mul_latency() -> Cycles {
        defaults::MUL_LATENCY
    }

    fn default_div_base_latency() -> Cycles {
        defaults::DIV_BASE_LATENCY
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            mul_latency: defaults::MUL_LATENCY,
            div_base_latency: defaults::DIV_BASE_LATENCY,
        }
    }
}
