//! `partition`: merge profile lists into one deduplicated URL list.
//!
//! Usage: `partition [CONFIG]`, where `CONFIG` is a RON file (default `partition.ron`).
//! `PARTITION_LOG=terminal|file|both` picks where logs go (default `terminal`).
mod config;
mod logging;
mod prompt;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;

use partition_engine::{run_partition, RunSummary};
use partition_logging::partition_warn;

use crate::config::load_config;
use crate::logging::LogDestination;
use crate::prompt::TerminalDecider;

const DEFAULT_CONFIG: &str = "partition.ron";
const LOG_ENV: &str = "PARTITION_LOG";

fn main() -> ExitCode {
    let requested = std::env::var(LOG_ENV).unwrap_or_default();
    match requested.parse::<LogDestination>() {
        Ok(destination) => logging::initialize(destination),
        Err(()) => {
            logging::initialize(LogDestination::Terminal);
            partition_warn!("ignoring {}={:?}; expected terminal, file or both", LOG_ENV, requested);
        }
    }

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    match run(&config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let stdin = io::stdin();
    let mut decider = TerminalDecider::new(stdin.lock(), io::stdout());

    let summary = run_partition(&config, &mut decider).context("partition run failed")?;
    if config.echo {
        for profile in &summary.kept {
            println!("{}", profile.url);
        }
    }
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    if let Some(report) = &summary.report {
        println!("duplicate report written to {}", report.display());
    }
    println!(
        "\nsummary: sources={} total_unique={} duplicates={} kept={}",
        summary.stats.len(),
        summary.total_unique,
        summary.duplicate_count,
        summary.kept.len()
    );
}
