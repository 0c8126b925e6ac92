//! Console summary, results log and solution export

use crate::{Result, Scenario};
use beam_assignment::{Assignment, AssignmentConfig};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Width of the scenario path column in the results log
const PATH_COLUMN_WIDTH: usize = 44;

/// Measurements of one solve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub scenario: PathBuf,
    pub total_users: usize,
    pub total_sats: usize,
    pub min_coverage: f64,
    pub assigned: usize,
    pub coverage: f64,
    pub elapsed_secs: f64,
}

impl RunSummary {
    pub fn new(
        scenario_path: &Path,
        scenario: &Scenario,
        assignment: &Assignment,
        elapsed: Duration,
    ) -> Self {
        Self {
            scenario: scenario_path.to_path_buf(),
            total_users: scenario.users.len(),
            total_sats: scenario.sats.len(),
            min_coverage: scenario.min_coverage,
            assigned: assignment.len(),
            coverage: assignment.coverage(scenario.users.len()),
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }

    /// `<path> <coverage%> <seconds>s` with fixed-width columns
    pub fn results_line(&self) -> String {
        format!(
            "{:<width$} {:>6.2}% {:>6.2}s",
            self.scenario.display().to_string(),
            100.0 * self.coverage,
            self.elapsed_secs,
            width = PATH_COLUMN_WIDTH
        )
    }

    pub fn meets_threshold(&self) -> bool {
        self.coverage >= self.min_coverage
    }
}

pub fn log_header(scenario_path: &Path, scenario: &Scenario) {
    info!("{}", "=".repeat(60));
    info!("{}", scenario_path.display());
    info!("{}", "=".repeat(60));
    info!(
        "Scenario: {:.2}% coverage ({} users, {} sats)",
        100.0 * scenario.min_coverage,
        scenario.users.len(),
        scenario.sats.len()
    );
}

/// Log the solve result; slow solves and low coverage are warnings
pub fn log_summary(summary: &RunSummary, budget: Duration) {
    let line = format!(
        "Solution: {:.2}% coverage ({} users) in {:.2}s",
        100.0 * summary.coverage,
        summary.assigned,
        summary.elapsed_secs
    );

    if summary.meets_threshold() {
        info!("{}", line);
    } else {
        warn!("{} (below {:.2}%)", line, 100.0 * summary.min_coverage);
    }

    if summary.elapsed_secs > budget.as_secs_f64() / 2.0 {
        warn!(
            "Solve used {:.2}s of a {:.2}s budget",
            summary.elapsed_secs,
            budget.as_secs_f64()
        );
    }
}

/// Append the summary line to the results log, creating it if needed
pub fn append_results_line(log_path: &Path, summary: &RunSummary) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(log_path)?;
    writeln!(file, "{}", summary.results_line())?;
    Ok(())
}

/// JSON export of a solve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionFile {
    pub assignment: Assignment,
    pub metadata: SolutionMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionMetadata {
    pub summary: RunSummary,
    pub config: AssignmentConfig,
    pub generated_at: String,
}

impl SolutionFile {
    pub fn new(summary: &RunSummary, assignment: Assignment) -> Self {
        Self {
            assignment,
            metadata: SolutionMetadata {
                summary: summary.clone(),
                config: AssignmentConfig::default(),
                generated_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
