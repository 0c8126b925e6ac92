//! Ray angles over 3D positions
//!
//! Every angle is in degrees. A zero-length ray has no direction, so the
//! angle functions return `None` for it instead of a NaN.

use nalgebra::Vector3;

/// Cartesian position (same units for users and satellites)
pub type Position = Vector3<f64>;

/// Default apex for [`visibility_angle`]
pub fn earth_center() -> Position {
    Position::zeros()
}

/// Angle between ray `apex → a` and ray `apex → b`
pub fn angle_between(apex: &Position, a: &Position, b: &Position) -> Option<f64> {
    let ray_a = (a - apex).try_normalize(0.0)?;
    let ray_b = (b - apex).try_normalize(0.0)?;

    // Rounding can push the dot product of parallel unit vectors past 1.0
    let cos = ray_a.dot(&ray_b).clamp(-1.0, 1.0);
    let angle = cos.acos().to_degrees();

    angle.is_finite().then_some(angle)
}

/// Engine visibility angle
///
/// Measured at `reference` between the vector `sat - user` and the user's
/// position vector. With the Earth's center as reference this is the angle
/// between the user's local vertical and the direction to the satellite.
pub fn visibility_angle(reference: &Position, user: &Position, sat: &Position) -> Option<f64> {
    let user_to_sat = sat - user;
    angle_between(reference, &user_to_sat, user)
}

/// Angle between two users as seen from a satellite
pub fn separation_angle(sat: &Position, user1: &Position, user2: &Position) -> Option<f64> {
    angle_between(sat, user1, user2)
}

/// Angle at the user between its unit vertical and the unit vector toward the satellite
///
/// This is the acceptance formula used when checking a finished assignment.
/// It is intentionally separate from [`visibility_angle`].
pub fn elevation_from_vertical(user: &Position, sat: &Position) -> Option<f64> {
    let vertical = user.try_normalize(0.0)?;
    let line_of_sight = (sat - user).try_normalize(0.0)?;

    let angle = vertical
        .dot(&line_of_sight)
        .clamp(-1.0, 1.0)
        .acos()
        .to_degrees();

    angle.is_finite().then_some(angle)
}
