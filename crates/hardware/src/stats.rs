//! Performance reporting.
//!
//! This module turns the counters kept by the pipeline's units into reports. It provides:
//! 1. **Performance:** Instructions, cycles, CPI, and the share of cycles lost to each
//!    latency source (caches, multiplier, divider, load-use hazards, mispredictions).
//! 2. **Caches:** Hit, miss and write-back counts and rates per level, split by reads and writes.
//! 3. **Branch prediction:** Direction, overall and target accuracy, BTB hit rate and
//!    a breakdown of misprediction causes.
//!
//! Reports are plain data (`serde::Serialize`) with a `print` method for text output.

use serde::Serialize;

use crate::common::Cycles;
use crate::core::Pipeline;
use crate::core::units::bru::BranchStats;
use crate::core::units::cache::CacheStats;

const RULE: &str = "==========================================================";
const SEPARATOR: &str = "----------------------------------------------------------";

/// `100 * part / whole`, or 0 when `whole` is 0.
fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// Overall timing of a run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PerformanceReport {
    /// Instructions submitted.
    pub instructions: u64,
    /// Total cycles, including the final pipeline drain.
    pub cycles: Cycles,
    /// Cycles per instruction.
    pub cpi: f64,
    /// Cycles charged by the L1 instruction and data caches.
    pub cache_latency: Cycles,
    /// Cycles charged by the multiplier.
    pub multiplier_latency: Cycles,
    /// Cycles charged by the divider.
    pub divider_latency: Cycles,
    /// Cycles lost to load-use stalls.
    pub hazard_latency: Cycles,
    /// Cycles lost to branch mispredictions.
    pub branch_latency: Cycles,
}

impl PerformanceReport {
    /// Collects the report from a pipeline.
    pub fn from_pipeline(pipeline: &Pipeline) -> Self {
        let ports = pipeline.ports();
        let memory = pipeline.memory();
        let execute = pipeline.execute_stage();
        let instructions = pipeline.instruction_count();
        let cycles = pipeline.cycle_count();
        Self {
            instructions,
            cycles,
            cpi: if instructions == 0 {
                0.0
            } else {
                cycles as f64 / instructions as f64
            },
            cache_latency: memory.latency(ports.l1_i).total() + memory.latency(ports.l1_d).total(),
            multiplier_latency: execute.multiplier().log().total(),
            divider_latency: execute.divider().log().total(),
            hazard_latency: pipeline.hazard_unit().latency().total(),
            branch_latency: pipeline.predictor().latency().total(),
        }
    }

    /// Share of all cycles spent on `latency`, in percent.
    pub fn share(&self, latency: Cycles) -> f64 {
        percent(latency, self.cycles)
    }

    /// Prints the report to stdout.
    pub fn print(&self) {
        println!("PERFORMANCE");
        println!("  sim_insts              {}", self.instructions);
        println!("  sim_cycles             {}", self.cycles);
        println!("  sim_cpi                {:.4}", self.cpi);
        for (name, latency) in [
            ("latency.cache        ", self.cache_latency),
            ("latency.multiplier   ", self.multiplier_latency),
            ("latency.divider      ", self.divider_latency),
            ("latency.load_use     ", self.hazard_latency),
            ("latency.mispredict   ", self.branch_latency),
        ] {
            println!("  {name}  {latency} ({:.2}%)", self.share(latency));
        }
        println!("{SEPARATOR}");
    }
}

/// Access statistics of one cache level.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CacheReport {
    /// Level name (`L1-I`, `L1-D`, `L2`).
    pub name: String,
    /// Read lookups.
    pub reads: u64,
    /// Read misses.
    pub read_misses: u64,
    /// Write lookups.
    pub writes: u64,
    /// Write misses.
    pub write_misses: u64,
    /// Dirty lines written back.
    pub writebacks: u64,
    /// All lookups.
    pub accesses: u64,
    /// All hits.
    pub hits: u64,
    /// All misses.
    pub misses: u64,
    /// Misses per lookup, in percent.
    pub miss_rate: f64,
    /// Read misses per read, in percent.
    pub read_miss_rate: f64,
    /// Write misses per write, in percent.
    pub write_miss_rate: f64,
    /// Write-backs per miss, in percent.
    pub writeback_rate: f64,
}

impl CacheReport {
    /// Builds the report for one level from its counters.
    pub fn new(name: &str, stats: &CacheStats) -> Self {
        Self {
            name: name.to_string(),
            reads: stats.reads,
            read_misses: stats.read_misses,
            writes: stats.writes,
            write_misses: stats.write_misses,
            writebacks: stats.writebacks,
            accesses: stats.accesses(),
            hits: stats.hits(),
            misses: stats.misses(),
            miss_rate: percent(stats.misses(), stats.accesses()),
            read_miss_rate: percent(stats.read_misses, stats.reads),
            write_miss_rate: percent(stats.write_misses, stats.writes),
            writeback_rate: percent(stats.writebacks, stats.misses()),
        }
    }

    /// Collects the L1-I, L1-D and L2 reports from a pipeline.
    pub fn from_pipeline(pipeline: &Pipeline) -> Vec<Self> {
        let ports = pipeline.ports();
        let memory = pipeline.memory();
        [ports.l1_i, ports.l1_d, ports.l2]
            .into_iter()
            .filter_map(|level| {
                memory
                    .cache(level)
                    .map(|cache| Self::new(memory.name(level), cache.stats()))
            })
            .collect()
    }

    /// Prints the report to stdout.
    pub fn print(&self) {
        println!(
            "  {:<6} accesses: {:<10} | hits: {:<10} | miss_rate: {:.2}% | writebacks: {} ({:.2}%)",
            self.name, self.accesses, self.hits, self.miss_rate, self.writebacks, self.writeback_rate
        );
        println!(
            "         reads: {:<13} | misses: {:<8} | miss_rate: {:.2}%",
            self.reads, self.read_misses, self.read_miss_rate
        );
        println!(
            "         writes: {:<12} | misses: {:<8} | miss_rate: {:.2}%",
            self.writes, self.write_misses, self.write_miss_rate
        );
    }
}

/// Branch predictor accuracy breakdown.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BranchReport {
    /// Raw counters.
    #[serde(flatten)]
    pub stats: BranchStats,
    /// Mispredicted branches.
    pub mispredictions: u64,
    /// Verified branches whose direction was predicted right, in percent.
    pub direction_accuracy: f64,
    /// Verified branches whose direction and target were both right, in percent.
    pub overall_accuracy: f64,
    /// Taken predictions that found a BTB target, in percent.
    pub btb_hit_rate: f64,
    /// BTB targets that matched the actual target of a taken branch, in percent.
    pub target_accuracy: f64,
    /// Cycles lost to mispredictions.
    pub latency: Cycles,
}

impl BranchReport {
    /// Builds the report from the predictor's counters.
    pub fn new(stats: BranchStats, latency: Cycles) -> Self {
        let fully_correct = stats.btb_hit_correct_target + stats.not_taken_correct;
        Self {
            mispredictions: stats.mispredictions(),
            direction_accuracy: percent(stats.correct_direction(), stats.verified),
            overall_accuracy: percent(fully_correct, stats.verified),
            btb_hit_rate: percent(stats.btb_hits, stats.predicted_taken),
            target_accuracy: percent(
                stats.btb_hit_correct_target,
                stats.btb_hit_correct_target + stats.btb_hit_wrong_target,
            ),
            latency,
            stats,
        }
    }

    /// Collects the report from a pipeline.
    pub fn from_pipeline(pipeline: &Pipeline) -> Self {
        let predictor = pipeline.predictor();
        Self::new(*predictor.stats(), predictor.latency().total())
    }

    /// Prints the report to stdout.
    pub fn print(&self) {
        let s = &self.stats;
        let share = |count: u64| percent(count, self.mispredictions);
        let redirected_wrong_way = s.btb_hit_wrong_direction + s.not_taken_incorrect;
        println!("BRANCH PREDICTION");
        println!("  bp.lookups             {}", s.predictions);
        println!("  bp.mispredicts         {}", self.mispredictions);
        println!("  bp.direction_accuracy  {:.2}%", self.direction_accuracy);
        println!("  bp.overall_accuracy    {:.2}%", self.overall_accuracy);
        println!("  bp.btb_hit_rate        {:.2}%", self.btb_hit_rate);
        println!("  bp.target_accuracy     {:.2}%", self.target_accuracy);
        println!("  mispredict causes");
        println!(
            "    direction            {} ({:.2}%)",
            redirected_wrong_way,
            share(redirected_wrong_way)
        );
        println!(
            "    target               {} ({:.2}%)",
            s.btb_hit_wrong_target,
            share(s.btb_hit_wrong_target)
        );
        println!(
            "    btb_miss             {} ({:.2}%)",
            s.btb_miss_taken,
            share(s.btb_miss_taken)
        );
        println!("{SEPARATOR}");
    }
}

/// All reports of one run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Timing summary.
    pub performance: PerformanceReport,
    /// One entry per cache level.
    pub caches: Vec<CacheReport>,
    /// Branch predictor breakdown.
    pub branch: BranchReport,
}

impl SimulationReport {
    /// Collects every report from a pipeline.
    pub fn from_pipeline(pipeline: &Pipeline) -> Self {
        Self {
            performance: PerformanceReport::from_pipeline(pipeline),
            caches: CacheReport::from_pipeline(pipeline),
            branch: BranchReport::from_pipeline(pipeline),
        }
    }

    /// Prints only the requested sections to stdout.
    ///
    /// # Arguments
    ///
    /// * `sections` - Any of `perf`, `cache` and `branch`. Empty prints everything.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |name: &str| sections.is_empty() || sections.iter().any(|s| s == name);

        println!("\n{RULE}");
        println!("RISC-V PIPELINE TIMING STATISTICS");
        println!("{RULE}");
        if want("perf") {
            self.performance.print();
        }
        if want("cache") {
            println!("MEMORY HIERARCHY");
            for cache in &self.caches {
                cache.print();
            }
            println!("{SEPARATOR}");
        }
        if want("branch") {
            self.branch.print();
        }
        println!("{RULE}");
    }

    /// Prints all sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
