//! RISC-V pipeline timing model CLI.
//!
//! This binary drives the timing model from recorded instruction traces. It performs:
//! 1. **Trace replay:** Feed a JSON Lines trace through the pipeline and print the reports.
//! 2. **Config dump:** Print the default machine configuration as JSON, as a template
//!    for `--config`.

use std::fs::File;
use std::io::BufReader;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use rvperf_core::config::Config;
use rvperf_core::sim::Simulator;

#[derive(Parser, Debug)]
#[command(
    name = "rvperf",
    author,
    version,
    about = "RISC-V five-stage pipeline timing model",
    long_about = "Replay a recorded instruction trace through a cycle-level model of an in-order\nfive-stage RISC-V pipeline and report CPI, cache and branch prediction statistics.\n\nExamples:\n  rvperf run trace.jsonl\n  rvperf run trace.jsonl --config machine.json --section cache\n  rvperf run trace.jsonl --json > report.json\n  rvperf config > machine.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Report sections selectable with `--section`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Section {
    /// Instructions, cycles, CPI and latency breakdown.
    Perf,
    /// Per-level cache statistics.
    Cache,
    /// Branch predictor statistics.
    Branch,
}

impl Section {
    const fn name(self) -> &'static str {
        match self {
            Self::Perf => "perf",
            Self::Cache => "cache",
            Self::Branch => "branch",
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSON Lines instruction trace.
    Run {
        /// Trace file, one JSON object per instruction.
        trace: String,

        /// Machine configuration (JSON). Missing fields keep their defaults.
        #[arg(short, long)]
        config: Option<String>,

        /// Print the reports as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Only print these report sections (repeatable).
        #[arg(short, long, value_enum)]
        section: Vec<Section>,

        /// Log hazards, mispredictions and write-backs (same as RUST_LOG=debug).
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the default configuration as JSON.
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            trace,
            config,
            json,
            section,
            verbose,
        } => {
            init_logging(verbose);
            cmd_run(&trace, config.as_deref(), json, &section);
        }
        Commands::Config => cmd_config(),
    }
}

/// Installs the log subscriber. `RUST_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Replays `trace_path` and prints the requested reports.
///
/// Exits with code 1 if the configuration or the trace cannot be read.
fn cmd_run(trace_path: &str, config_path: Option<&str>, json: bool, sections: &[Section]) {
    let config = match config_path {
        Some(path) => Config::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            process::exit(1);
        }),
        None => Config::default(),
    };

    let mut sim = Simulator::new(&config).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    let file = File::open(trace_path).unwrap_or_else(|e| {
        eprintln!("Error opening trace {trace_path}: {e}");
        process::exit(1);
    });

    if let Err(e) = sim.run_trace(BufReader::new(file)) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    let report = sim.report();
    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error encoding report: {e}");
                process::exit(1);
            }
        }
    } else {
        let names: Vec<String> = sections.iter().map(|s| s.name().to_string()).collect();
        report.print_sections(&names);
    }
}

/// Prints `Config::default()` as pretty JSON.
fn cmd_config() {
    match serde_json::to_string_pretty(&Config::default()) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error encoding configuration: {e}");
            process::exit(1);
        }
    }
}
