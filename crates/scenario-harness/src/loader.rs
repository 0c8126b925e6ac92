//! Scenario loading from line-based text files
//!
//! ```text
//! # comment
//! min_coverage 0.95
//! sat 1 0.0 0.0 7371.0
//! user 1 0.0 0.0 6371.0
//! ```

use crate::{ScenarioError, DEFAULT_MIN_COVERAGE};
use beam_assignment::{Position, SatId, UserId};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};
use tracing::{debug, info};

/// A single test case
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// User positions
    pub users: BTreeMap<UserId, Position>,
    /// Satellite positions
    pub sats: BTreeMap<SatId, Position>,
    /// Minimum passing coverage (fraction of users)
    pub min_coverage: f64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            sats: BTreeMap::new(),
            min_coverage: DEFAULT_MIN_COVERAGE,
        }
    }
}

impl Scenario {
    /// Load a scenario from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        info!("Loading scenario from {:?}", path);

        let text = fs::read_to_string(path)?;
        let scenario: Scenario = text.parse()?;

        info!(
            "Loaded {} users and {} satellites (min coverage {:.2}%)",
            scenario.users.len(),
            scenario.sats.len(),
            100.0 * scenario.min_coverage
        );

        Ok(scenario)
    }
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut scenario = Scenario::default();

        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            if raw.starts_with('#') || raw.trim().is_empty() {
                continue;
            }

            let mut fields = raw.split_whitespace();
            let token = fields.next().unwrap_or_default();

            match token {
                "min_coverage" => {
                    scenario.min_coverage = parse_field(&mut fields, line, "min_coverage")?;
                }
                "sat" => {
                    let (id, pos) = parse_entity(&mut fields, line)?;
                    if scenario.sats.insert(SatId(id), pos).is_some() {
                        debug!("Line {}: satellite {} redefined", line, id);
                    }
                }
                "user" => {
                    let (id, pos) = parse_entity(&mut fields, line)?;
                    if scenario.users.insert(UserId(id), pos).is_some() {
                        debug!("Line {}: user {} redefined", line, id);
                    }
                }
                other => {
                    return Err(ScenarioError::InvalidToken {
                        line,
                        token: other.to_string(),
                    });
                }
            }
        }

        Ok(scenario)
    }
}

/// Parse `<id> <x> <y> <z>`
fn parse_entity(fields: &mut SplitWhitespace<'_>, line: usize) -> Result<(i32, Position), ScenarioError> {
    let id = parse_field(fields, line, "id")?;
    let x = parse_field(fields, line, "x")?;
    let y = parse_field(fields, line, "y")?;
    let z = parse_field(fields, line, "z")?;
    Ok((id, Position::new(x, y, z)))
}

fn parse_field<T: FromStr>(
    fields: &mut SplitWhitespace<'_>,
    line: usize,
    field: &'static str,
) -> Result<T, ScenarioError> {
    let value = fields.next().unwrap_or_default();
    value.parse().map_err(|_| ScenarioError::InvalidField {
        line,
        field,
        value: value.to_string(),
    })
}
