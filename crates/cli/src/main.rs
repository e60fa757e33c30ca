//! Cache simulator CLI.
//!
//! This binary replays a memory trace against one set-associative cache. It performs:
//! 1. **Configuration:** Geometry from `-s`/`-E`/`-b`, optionally layered over a JSON file.
//! 2. **Replay:** Lazy parsing of the trace file, one access at a time.
//! 3. **Reporting:** The summary line (or a JSON report) and, with `-v`, the outcome of every access.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use csim_core::common::SimError;
use csim_core::config::CacheConfig;
use csim_core::sim::{Simulator, loader};
use csim_core::stats::FinalStats;

#[derive(Parser, Debug)]
#[command(
    name = "csim",
    author,
    version,
    about = "Trace-driven set-associative cache simulator",
    long_about = "Replay a memory trace against a cache with 2^s sets of E lines of 2^b bytes.\n\nTrace lines look like `L 7ff000398,8` or `S 10, 4`.\n\nExamples:\n  csim -s 4 -E 1 -b 4 -t traces/yi.trace\n  csim -v -s 2 -E 2 -b 3 -t traces/dave.trace\n  csim --config l1.json -t traces/long.trace --json"
)]
struct Cli {
    /// Number of set index bits (there are 2^s sets).
    #[arg(short = 's', required_unless_present = "config")]
    set_index_bits: Option<u32>,

    /// Number of lines per set (associativity).
    #[arg(short = 'E', required_unless_present = "config")]
    lines_per_set: Option<usize>,

    /// Number of block bits (blocks are 2^b bytes).
    #[arg(short = 'b', required_unless_present = "config")]
    block_bits: Option<u32>,

    /// Trace file to replay.
    #[arg(short = 't')]
    trace: PathBuf,

    /// Report the effect of each memory operation.
    #[arg(short, long)]
    verbose: bool,

    /// JSON file with `set_index_bits`, `lines_per_set` and `block_bits`; flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final statistics as JSON instead of the summary line.
    #[arg(long)]
    json: bool,
}

/// JSON report written with `--json`.
#[derive(Serialize)]
struct Report {
    config: CacheConfig,
    operations: u64,
    stats: FinalStats,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Merges the JSON configuration (if any) with the command-line flags.
fn resolve_config(cli: &Cli) -> Result<CacheConfig, SimError> {
    let mut config = match &cli.config {
        Some(path) => CacheConfig::load(path)?,
        // clap requires all of -s, -E and -b without --config.
        None => CacheConfig::default(),
    };

    if let Some(s) = cli.set_index_bits {
        config.set_index_bits = s;
    }
    if let Some(e) = cli.lines_per_set {
        config.lines_per_set = e;
    }
    if let Some(b) = cli.block_bits {
        config.block_bits = b;
    }
    Ok(config)
}

/// Validates the configuration, replays the trace and prints the result.
fn run(cli: &Cli) -> Result<(), SimError> {
    let config = resolve_config(cli)?;
    // Rejects a bad geometry before the trace file is touched.
    let mut sim = Simulator::new(&config)?;
    let trace = loader::open_trace(&cli.trace)?;
    info!(trace = %cli.trace.display(), "replaying");

    let stats = if cli.verbose {
        sim.run_with(trace, |op, outcome| println!("{op} {outcome}"))?
    } else {
        sim.run(trace)?
    };

    if cli.json {
        let report = Report {
            config,
            operations: sim.operations(),
            stats,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: could not serialize report: {e}");
                process::exit(1);
            }
        }
    } else {
        stats.print();
    }
    Ok(())
}
