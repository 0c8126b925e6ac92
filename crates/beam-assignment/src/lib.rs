//! Beam Assignment Library
//!
//! Greedy assignment of ground users to satellites and to one of four
//! reusable frequency channels ("colors").
//!
//! # Constraints
//!
//! | Rule | Default | Measured |
//! |------|---------|----------|
//! | Visibility | ≤ 45° | [`geometry::visibility_angle`] |
//! | Same-color separation | ≥ 10° | [`geometry::separation_angle`] |
//! | Beams per satellite | ≤ 32 | across all colors |
//! | Colors per satellite | ≤ 4 | [`Color::ALL`] |
//!
//! Inputs are `BTreeMap`s so that satellites and users are always visited in
//! ascending id order. The outcome of the greedy pass depends on that order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod engine;
pub mod geometry;

pub use engine::{assign, assign_with};
pub use geometry::Position;

/// Maximum angle from vertical (degrees) at which a user can see a satellite
pub const MAX_VISIBILITY_DEG: f64 = 45.0;

/// Minimum angle (degrees) between two same-color users seen from their satellite
pub const MIN_SEPARATION_DEG: f64 = 10.0;

/// Beam cap shared by all colors of one satellite
pub const MAX_BEAMS_PER_SATELLITE: usize = 32;

/// Ground user identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i32);

/// Satellite identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SatId(pub i32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Frequency channel. Declaration order is the fill and scan order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Color {
    A,
    B,
    C,
    D,
}

impl Color {
    /// All colors in fill order
    pub const ALL: [Color; 4] = [Color::A, Color::B, Color::C, Color::D];

    /// Number of colors available per satellite
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this color in the fill order
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_char(self) -> char {
        match self {
            Color::A => 'A',
            Color::B => 'B',
            Color::C => 'C',
            Color::D => 'D',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A single user-to-satellite link on one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beam {
    pub sat: SatId,
    pub color: Color,
}

/// Engine tuning
///
/// Defaults reproduce the reference constraint set. The reference point is the
/// apex used by [`geometry::visibility_angle`] (the Earth's center).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentConfig {
    /// Visibility threshold in degrees (inclusive)
    pub max_visibility_deg: f64,
    /// Same-color separation threshold in degrees (inclusive)
    pub min_separation_deg: f64,
    /// Beams shared by all colors of one satellite
    pub max_beams_per_satellite: usize,
    /// Apex for the visibility angle
    pub reference_point: Position,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            max_visibility_deg: MAX_VISIBILITY_DEG,
            min_separation_deg: MIN_SEPARATION_DEG,
            max_beams_per_satellite: MAX_BEAMS_PER_SATELLITE,
            reference_point: geometry::earth_center(),
        }
    }
}

/// Final user → beam mapping
///
/// Each user appears at most once. Iteration is in ascending user id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    beams: BTreeMap<UserId, Beam>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a beam for `user`. Returns the previous beam if one existed.
    pub fn insert(&mut self, user: UserId, beam: Beam) -> Option<Beam> {
        self.beams.insert(user, beam)
    }

    pub fn get(&self, user: UserId) -> Option<&Beam> {
        self.beams.get(&user)
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.beams.contains_key(&user)
    }

    pub fn len(&self) -> usize {
        self.beams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UserId, Beam)> + '_ {
        self.beams.iter().map(|(user, beam)| (*user, *beam))
    }

    /// Fraction of `total_users` that received a beam.
    ///
    /// Zero users counts as full coverage, so an empty scenario passes any
    /// coverage threshold instead of failing on a NaN ratio.
    pub fn coverage(&self, total_users: usize) -> f64 {
        if total_users == 0 {
            return 1.0;
        }
        self.beams.len() as f64 / total_users as f64
    }

    /// Users grouped by satellite, each list in ascending user id
    pub fn by_satellite(&self) -> BTreeMap<SatId, Vec<(UserId, Color)>> {
        let mut grouped: BTreeMap<SatId, Vec<(UserId, Color)>> = BTreeMap::new();
        for (user, beam) in self.iter() {
            grouped.entry(beam.sat).or_default().push((user, beam.color));
        }
        grouped
    }
}

impl FromIterator<(UserId, Beam)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (UserId, Beam)>>(iter: I) -> Self {
        Self {
            beams: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_order() {
        assert_eq!(Color::COUNT, 4);
        for (i, color) in Color::ALL.iter().enumerate() {
            assert_eq!(color.index(), i);
            assert_eq!(Color::from_index(i), Some(*color));
        }
        assert_eq!(Color::from_index(4), None);
        assert!(Color::A < Color::D);
        assert_eq!(Color::C.to_string(), "C");
    }

    #[test]
    fn test_coverage() {
        let mut assignment = Assignment::new();
        assert_eq!(assignment.coverage(0), 1.0);
        assert_eq!(assignment.coverage(4), 0.0);

        assignment.insert(UserId(1), Beam { sat: SatId(7), color: Color::A });
        assignment.insert(UserId(2), Beam { sat: SatId(7), color: Color::B });
        assert!((assignment.coverage(4) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_by_satellite_groups_in_user_order() {
        let assignment: Assignment = [
            (UserId(3), Beam { sat: SatId(2), color: Color::A }),
            (UserId(1), Beam { sat: SatId(1), color: Color::B }),
            (UserId(2), Beam { sat: SatId(2), color: Color::A }),
        ]
        .into_iter()
        .collect();

        let grouped = assignment.by_satellite();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&SatId(1)], vec![(UserId(1), Color::B)]);
        assert_eq!(
            grouped[&SatId(2)],
            vec![(UserId(2), Color::A), (UserId(3), Color::A)]
        );
    }
}
