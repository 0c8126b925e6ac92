//! Beam Assignment Scenario Runner
//!
//! Solves one scenario, appends a line to the results log and exits non-zero
//! if loading fails, the solve exceeds its budget, or any check fails.
//!
//! Usage:
//!   run-scenario scenarios/01_simple.txt results.txt
//!   run-scenario scenarios/05_crowded.txt results.txt --solution out.json -v

use anyhow::Result;
use clap::Parser;
use scenario_harness::{run_scenario, RunOptions, DEFAULT_TIMEOUT_SECS};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "run-scenario",
    about = "Assign users to satellite beams for one scenario and check the result"
)]
struct Args {
    /// Scenario file
    test_case: PathBuf,

    /// Results log (one line appended per run)
    out_path: PathBuf,

    /// Wall-clock budget for the solve in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Also write the assignment as JSON
    #[arg(long)]
    solution: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let options = RunOptions {
        results_log: args.out_path,
        timeout: Duration::from_secs(args.timeout_secs),
        solution_path: args.solution,
    };

    let summary = run_scenario(&args.test_case, &options)?;

    info!(
        "PASS: {} ({}/{} users)",
        summary.scenario.display(),
        summary.assigned,
        summary.total_users
    );

    Ok(())
}
