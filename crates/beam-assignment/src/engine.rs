//! Greedy satellite-major assignment
//!
//! Satellites are visited in ascending id; for each one, users are visited in
//! ascending id and admitted on a first-fit basis. There is no backtracking:
//! once a user holds a beam no later satellite considers it.

use crate::geometry::{separation_angle, visibility_angle, Position};
use crate::{Assignment, AssignmentConfig, Beam, Color, SatId, UserId};
use std::collections::BTreeMap;
use tracing::{debug, info, trace};

/// Users admitted to one color of one satellite, in admission order
#[derive(Debug, Clone)]
pub struct BeamGroup {
    pub color: Color,
    members: Vec<(UserId, Position)>,
}

impl BeamGroup {
    fn open(color: Color, user: UserId, position: Position) -> Self {
        Self {
            color,
            members: vec![(user, position)],
        }
    }

    pub fn members(&self) -> impl Iterator<Item = UserId> + '_ {
        self.members.iter().map(|(user, _)| *user)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True when `candidate` is at least `min_separation_deg` from every member
    fn accepts(&self, sat: &Position, candidate: &Position, min_separation_deg: f64) -> bool {
        self.members.iter().all(|(other, position)| {
            match separation_angle(sat, candidate, position) {
                Some(angle) => angle >= min_separation_deg,
                None => {
                    trace!("Degenerate separation against user {}, color blocked", other);
                    false
                }
            }
        })
    }
}

/// Running state of one satellite during the pass
#[derive(Debug, Clone)]
pub struct SatelliteState {
    pub sat: SatId,
    position: Position,
    beams: usize,
    groups: Vec<BeamGroup>,
}

impl SatelliteState {
    pub fn new(sat: SatId, position: Position) -> Self {
        Self {
            sat,
            position,
            beams: 0,
            groups: Vec::with_capacity(Color::COUNT),
        }
    }

    /// Total users admitted across all colors
    pub fn beams(&self) -> usize {
        self.beams
    }

    /// Opened color groups, in fill order
    pub fn groups(&self) -> &[BeamGroup] {
        &self.groups
    }

    /// Try to place `user` on this satellite
    ///
    /// While fewer than four colors are open the next color is opened for the
    /// user unconditionally. Afterwards colors are scanned in fill order and
    /// the first one whose members are all far enough away wins.
    fn admit(&mut self, user: UserId, position: Position, min_separation_deg: f64) -> Option<Color> {
        if let Some(color) = Color::from_index(self.groups.len()) {
            self.groups.push(BeamGroup::open(color, user, position));
            self.beams += 1;
            return Some(color);
        }

        let sat_position = self.position;
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.accepts(&sat_position, &position, min_separation_deg))?;

        group.members.push((user, position));
        self.beams += 1;
        Some(group.color)
    }
}

/// Assign users to satellites with the default constraint set
pub fn assign(
    users: &BTreeMap<UserId, Position>,
    sats: &BTreeMap<SatId, Position>,
) -> Assignment {
    assign_with(&AssignmentConfig::default(), users, sats)
}

/// Assign users to satellites
///
/// Always returns; users that fit nowhere are simply absent from the result.
pub fn assign_with(
    config: &AssignmentConfig,
    users: &BTreeMap<UserId, Position>,
    sats: &BTreeMap<SatId, Position>,
) -> Assignment {
    info!(
        "Assigning {} users across {} satellites",
        users.len(),
        sats.len()
    );

    let mut assignment = Assignment::new();

    for (&sat_id, sat_position) in sats {
        let mut state = SatelliteState::new(sat_id, *sat_position);

        for (&user_id, user_position) in users {
            if state.beams >= config.max_beams_per_satellite {
                break;
            }
            if assignment.contains(user_id) {
                continue;
            }

            match visibility_angle(&config.reference_point, user_position, sat_position) {
                Some(angle) if angle <= config.max_visibility_deg => {}
                Some(_) => continue,
                None => {
                    trace!("Degenerate visibility for user {} on sat {}", user_id, sat_id);
                    continue;
                }
            }

            if let Some(color) = state.admit(user_id, *user_position, config.min_separation_deg) {
                assignment.insert(
                    user_id,
                    Beam {
                        sat: sat_id,
                        color,
                    },
                );
            }
        }

        debug!(
            "Sat {}: {} beams over {} colors {:?}",
            sat_id,
            state.beams,
            state.groups.len(),
            state.groups.iter().map(BeamGroup::len).collect::<Vec<_>>()
        );
    }

    info!(
        "Assigned {} of {} users ({:.2}%)",
        assignment.len(),
        users.len(),
        100.0 * assignment.coverage(users.len())
    );

    assignment
}
