//! Independent solution checking
//!
//! Visibility is re-derived with [`elevation_from_vertical`] (apex at the
//! user), not with the engine's own visibility angle. The engine makes no
//! attempt to satisfy this formula exactly; the two agree only when the
//! engine's reference point is the Earth's center.

use crate::{Scenario, ValidationError};
use beam_assignment::geometry::{elevation_from_vertical, separation_angle};
use beam_assignment::{
    Assignment, SatId, MAX_BEAMS_PER_SATELLITE, MAX_VISIBILITY_DEG, MIN_SEPARATION_DEG,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Outcome of a successful check
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub assigned: usize,
    pub total_users: usize,
    pub coverage: f64,
    pub beams_per_sat: BTreeMap<SatId, usize>,
}

/// Check an assignment against a scenario
///
/// Returns the first violation found: unknown ids, visibility, capacity,
/// same-color separation, then coverage.
pub fn validate(scenario: &Scenario, assignment: &Assignment) -> Result<ValidationReport, ValidationError> {
    for (user, beam) in assignment.iter() {
        let user_pos = scenario
            .users
            .get(&user)
            .ok_or(ValidationError::UnknownUser(user))?;
        let sat_pos = scenario
            .sats
            .get(&beam.sat)
            .ok_or(ValidationError::UnknownSatellite { user, sat: beam.sat })?;

        match elevation_from_vertical(user_pos, sat_pos) {
            Some(angle) if angle <= MAX_VISIBILITY_DEG => {}
            // A degenerate geometry has no direction to measure, so it cannot pass
            measured => {
                return Err(ValidationError::NotVisible {
                    user,
                    sat: beam.sat,
                    angle: measured.unwrap_or(f64::NAN),
                });
            }
        }
    }

    let grouped = assignment.by_satellite();
    let mut beams_per_sat = BTreeMap::new();

    for (sat, members) in &grouped {
        if members.len() > MAX_BEAMS_PER_SATELLITE {
            return Err(ValidationError::OverCapacity {
                sat: *sat,
                beams: members.len(),
                max: MAX_BEAMS_PER_SATELLITE,
            });
        }
        beams_per_sat.insert(*sat, members.len());

        let sat_pos = &scenario.sats[sat];
        for (i, (user1, color1)) in members.iter().enumerate() {
            for (user2, color2) in members.iter().skip(i + 1) {
                if color1 != color2 {
                    continue;
                }
                let angle = separation_angle(sat_pos, &scenario.users[user1], &scenario.users[user2])
                    .unwrap_or(0.0);
                if angle < MIN_SEPARATION_DEG {
                    return Err(ValidationError::TooClose {
                        user1: *user1,
                        user2: *user2,
                        sat: *sat,
                        color: *color1,
                        angle,
                    });
                }
            }
        }
        debug!("Satellite {} passed with {} beams", sat, members.len());
    }

    let total_users = scenario.users.len();
    let coverage = assignment.coverage(total_users);
    if coverage < scenario.min_coverage {
        return Err(ValidationError::InsufficientCoverage {
            coverage,
            min_coverage: scenario.min_coverage,
        });
    }

    Ok(ValidationReport {
        assigned: assignment.len(),
        total_users,
        coverage,
        beams_per_sat,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use beam_assignment::{assign, Beam, Color, Position, UserId};

    fn scenario(text: &str) -> Scenario {
        text.parse().unwrap()
    }

    fn beam(sat: i32, color: Color) -> Beam {
        Beam { sat: SatId(sat), color }
    }

    const OVERHEAD: &str = "\
min_coverage 0.5
sat 1 0 0 7371
user 1 0 0 6371
user 2 0 0 -6371
";

    #[test]
    fn test_engine_solution_validates() {
        let s = scenario(OVERHEAD);
        let assignment = assign(&s.users, &s.sats);
        let report = validate(&s, &assignment).unwrap();
        assert_eq!(report.assigned, 1);
        assert_eq!(report.total_users, 2);
        assert!((report.coverage - 0.5).abs() < 1e-12);
        assert_eq!(report.beams_per_sat[&SatId(1)], 1);
    }

    #[test]
    fn test_unknown_ids() {
        let s = scenario(OVERHEAD);

        let assignment: Assignment = [(UserId(9), beam(1, Color::A))].into_iter().collect();
        assert_eq!(
            validate(&s, &assignment),
            Err(ValidationError::UnknownUser(UserId(9)))
        );

        let assignment: Assignment = [(UserId(1), beam(4, Color::A))].into_iter().collect();
        assert_eq!(
            validate(&s, &assignment),
            Err(ValidationError::UnknownSatellite {
                user: UserId(1),
                sat: SatId(4)
            })
        );
    }

    #[test]
    fn test_not_visible() {
        let s = scenario(OVERHEAD);
        let assignment: Assignment = [(UserId(2), beam(1, Color::A))].into_iter().collect();
        match validate(&s, &assignment) {
            Err(ValidationError::NotVisible { user, sat, angle }) => {
                assert_eq!(user, UserId(2));
                assert_eq!(sat, SatId(1));
                assert!((angle - 180.0).abs() < 1e-6);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_over_capacity() {
        let mut s = Scenario::default();
        s.sats.insert(SatId(1), Position::new(0.0, 0.0, 7371.0));
        let mut assignment = Assignment::new();
        for i in 0..33 {
            s.users.insert(UserId(i), Position::new(0.0, 0.0, 6371.0));
            let color = Color::ALL[i as usize % Color::COUNT];
            assignment.insert(UserId(i), beam(1, color));
        }

        assert!(matches!(
            validate(&s, &assignment),
            Err(ValidationError::OverCapacity { beams: 33, .. })
        ));
    }

    #[test]
    fn test_too_close_same_color_only() {
        let s = scenario(
            "sat 1 0 0 7371\nuser 1 0 0 6371\nuser 2 10 0 6371\nmin_coverage 0\n",
        );

        let different: Assignment = [
            (UserId(1), beam(1, Color::A)),
            (UserId(2), beam(1, Color::B)),
        ]
        .into_iter()
        .collect();
        assert!(validate(&s, &different).is_ok());

        let same: Assignment = [
            (UserId(1), beam(1, Color::C)),
            (UserId(2), beam(1, Color::C)),
        ]
        .into_iter()
        .collect();
        match validate(&s, &same) {
            Err(ValidationError::TooClose {
                user1,
                user2,
                color,
                angle,
                ..
            }) => {
                assert_eq!((user1, user2), (UserId(1), UserId(2)));
                assert_eq!(color, Color::C);
                assert!(angle < 1.0);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_insufficient_coverage() {
        let s = scenario("sat 1 0 0 7371\nuser 1 0 0 6371\nuser 2 0 0 -6371\n");
        let assignment = assign(&s.users, &s.sats);
        let err = validate(&s, &assignment).unwrap_err();
        assert!(matches!(err, ValidationError::InsufficientCoverage { .. }));
        assert_eq!(err.to_string(), "Too few users served: 50.00% < 100.00%");
    }

    #[test]
    fn test_empty_scenario_has_full_coverage() {
        let s = Scenario::default();
        let report = validate(&s, &Assignment::new()).unwrap();
        assert_eq!(report.coverage, 1.0);
    }
}
