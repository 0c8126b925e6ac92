//! Beam Assignment Scenario Harness
//!
//! Loads a scenario file, runs the assignment engine under a wall-clock budget,
//! appends a line to a results log and re-checks the solution independently.
//!
//! # Pipeline
//!
//! ```text
//! scenario file → loader → assign() → results log → timeout check → validator
//! ```
//!
//! The results line is written before any check so that failing runs are
//! still recorded.

use beam_assignment::{Color, SatId, UserId};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

pub mod loader;
pub mod report;
pub mod validator;

pub use loader::Scenario;
pub use report::{RunSummary, SolutionFile};
pub use validator::{validate, ValidationReport};

/// Wall-clock budget for a single solve
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Passing coverage when a scenario does not set `min_coverage`
pub const DEFAULT_MIN_COVERAGE: f64 = 1.0;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid token '{token}' on line {line}")]
    InvalidToken { line: usize, token: String },
    #[error("Invalid {field} on line {line}: '{value}'")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unknown user {0} in solution")]
    UnknownUser(UserId),
    #[error("Unknown satellite {sat} assigned to user {user}")]
    UnknownSatellite { user: UserId, sat: SatId },
    #[error("User {user} cannot see satellite {sat} ({angle:.2} degrees from vertical)")]
    NotVisible { user: UserId, sat: SatId, angle: f64 },
    #[error("Satellite {sat} cannot serve more than {max} users ({beams} assigned)")]
    OverCapacity { sat: SatId, beams: usize, max: usize },
    #[error("Users {user1} and {user2} on satellite {sat} color {color} are too close ({angle:.2} degrees)")]
    TooClose {
        user1: UserId,
        user2: UserId,
        sat: SatId,
        color: Color,
        angle: f64,
    },
    #[error("Too few users served: {:.2}% < {:.2}%", .coverage * 100.0, .min_coverage * 100.0)]
    InsufficientCoverage { coverage: f64, min_coverage: f64 },
}

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Took too long to produce a solution: {elapsed:.2}s > {budget:.2}s")]
    Timeout { elapsed: f64, budget: f64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;

/// Options for a single harness run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Results log; one line is appended per run
    pub results_log: PathBuf,
    /// Wall-clock budget for the solve
    pub timeout: Duration,
    /// Optional JSON dump of the assignment
    pub solution_path: Option<PathBuf>,
}

impl RunOptions {
    pub fn new(results_log: impl Into<PathBuf>) -> Self {
        Self {
            results_log: results_log.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            solution_path: None,
        }
    }
}

/// Load, solve, log and validate one scenario
pub fn run_scenario(scenario_path: impl AsRef<Path>, options: &RunOptions) -> Result<RunSummary> {
    let scenario_path = scenario_path.as_ref();
    let scenario = Scenario::load(scenario_path)?;

    report::log_header(scenario_path, &scenario);

    let start = Instant::now();
    let assignment = beam_assignment::assign(&scenario.users, &scenario.sats);
    let elapsed = start.elapsed();

    let summary = RunSummary::new(scenario_path, &scenario, &assignment, elapsed);
    report::log_summary(&summary, options.timeout);
    report::append_results_line(&options.results_log, &summary)?;

    if let Some(path) = &options.solution_path {
        info!("Writing solution to {:?}", path);
        SolutionFile::new(&summary, assignment.clone()).write(path)?;
    }

    if elapsed >= options.timeout {
        return Err(HarnessError::Timeout {
            elapsed: elapsed.as_secs_f64(),
            budget: options.timeout.as_secs_f64(),
        });
    }

    let checked = validate(&scenario, &assignment).map_err(|e| {
        warn!("Validation failed: {}", e);
        e
    })?;
    info!(
        "Validated {} beams across {} satellites",
        checked.assigned,
        checked.beams_per_sat.len()
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SIMPLE: &str = "\
# one satellite straight above one user
min_coverage 1.0
sat 1 0 0 7371
user 1 0 0 6371
";

    #[test]
    fn test_run_scenario_writes_results_line() {
        let dir = tempdir().unwrap();
        let scenario_path = dir.path().join("simple.txt");
        fs::write(&scenario_path, SIMPLE).unwrap();

        let mut options = RunOptions::new(dir.path().join("results.log"));
        options.solution_path = Some(dir.path().join("solution.json"));

        let summary = run_scenario(&scenario_path, &options).unwrap();
        assert_eq!(summary.assigned, 1);
        assert!((summary.coverage - 1.0).abs() < 1e-12);

        let log = fs::read_to_string(&options.results_log).unwrap();
        assert_eq!(log.lines().count(), 1);
        assert!(log.contains("100.00%"));

        let solution = fs::read_to_string(dir.path().join("solution.json")).unwrap();
        assert!(solution.contains("\"assignment\""));
    }

    #[test]
    fn test_run_scenario_fails_on_coverage_but_still_logs() {
        let dir = tempdir().unwrap();
        let scenario_path = dir.path().join("blocked.txt");
        fs::write(
            &scenario_path,
            "sat 1 0 0 7371\nuser 1 0 0 -6371\nmin_coverage 0.5\n",
        )
        .unwrap();

        let options = RunOptions::new(dir.path().join("results.log"));
        let err = run_scenario(&scenario_path, &options).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::Validation(ValidationError::InsufficientCoverage { .. })
        ));

        let log = fs::read_to_string(&options.results_log).unwrap();
        assert!(log.contains("0.00%"));
    }

    #[test]
    fn test_run_scenario_zero_budget_times_out() {
        let dir = tempdir().unwrap();
        let scenario_path = dir.path().join("simple.txt");
        fs::write(&scenario_path, SIMPLE).unwrap();

        let mut options = RunOptions::new(dir.path().join("results.log"));
        options.timeout = Duration::ZERO;

        let err = run_scenario(&scenario_path, &options).unwrap_err();
        assert!(matches!(err, HarnessError::Timeout { .. }));
    }

    #[test]
    fn test_run_scenario_missing_file() {
        let dir = tempdir().unwrap();
        let options = RunOptions::new(dir.path().join("results.log"));
        let err = run_scenario(dir.path().join("nope.txt"), &options).unwrap_err();
        assert!(matches!(err, HarnessError::Scenario(ScenarioError::Io(_))));
    }
}
