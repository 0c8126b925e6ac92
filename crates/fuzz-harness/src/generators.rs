//! Position and scenario generators for property-based testing
//!
//! Users sit on a spherical Earth; satellites sit on a shell above it. Both are
//! drawn from the same spherical cap so that a useful share of the generated
//! users is actually visible from some satellite.

use nalgebra::Vector3;
use proptest::prelude::*;

/// Mean Earth radius in km
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Half-width in degrees of the lat/lon window used by the generators
pub const CAP_HALF_WIDTH_DEG: f64 = 25.0;

// ============================================================================
// Geometry Helpers
// ============================================================================

/// Spherical lat/lon (degrees) to Cartesian at `radius`
pub fn spherical_to_cartesian(lat_deg: f64, lon_deg: f64, radius: f64) -> Vector3<f64> {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    Vector3::new(
        radius * lat.cos() * lon.cos(),
        radius * lat.cos() * lon.sin(),
        radius * lat.sin(),
    )
}

/// Ground point seen from `sat` at a nadir angle and azimuth
///
/// The nadir direction points from the satellite toward the Earth's center.
/// Azimuth is measured around the nadir in a frame built from the global
/// x axis (or y when the satellite lies on the x axis). Returns `None` when the
/// ray misses the sphere of radius `earth_radius`.
pub fn point_below(
    sat: &Vector3<f64>,
    nadir_deg: f64,
    azimuth_deg: f64,
    earth_radius: f64,
) -> Option<Vector3<f64>> {
    let down = (-sat).try_normalize(0.0)?;

    let helper = if down.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let east = helper.cross(&down).try_normalize(0.0)?;
    let north = down.cross(&east);

    let eta = nadir_deg.to_radians();
    let phi = azimuth_deg.to_radians();
    let dir = down * eta.cos() + (north * phi.cos() + east * phi.sin()) * eta.sin();

    // |sat + t·dir|² = r², nearest intersection
    let b = sat.dot(&dir);
    let c = sat.norm_squared() - earth_radius * earth_radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t > 0.0).then(|| sat + dir * t)
}

// ============================================================================
// Coordinate Generators
// ============================================================================

/// Latitude inside the generator cap (degrees)
pub fn cap_latitude_deg() -> impl Strategy<Value = f64> {
    -CAP_HALF_WIDTH_DEG..=CAP_HALF_WIDTH_DEG
}

/// Longitude inside the generator cap (degrees)
pub fn cap_longitude_deg() -> impl Strategy<Value = f64> {
    -CAP_HALF_WIDTH_DEG..=CAP_HALF_WIDTH_DEG
}

/// LEO to low MEO altitude in km
pub fn altitude_km() -> impl Strategy<Value = f64> {
    500.0..=2_000.0f64
}

/// Any longitude (degrees)
pub fn longitude_deg() -> impl Strategy<Value = f64> {
    -180.0..=180.0f64
}

/// Any latitude (degrees)
pub fn latitude_deg() -> impl Strategy<Value = f64> {
    -90.0..=90.0f64
}

// ============================================================================
// Position Generators
// ============================================================================

/// User on the Earth's surface inside the generator cap
pub fn ground_position() -> impl Strategy<Value = Vector3<f64>> {
    (cap_latitude_deg(), cap_longitude_deg())
        .prop_map(|(lat, lon)| spherical_to_cartesian(lat, lon, EARTH_RADIUS_KM))
}

/// User anywhere on the Earth's surface
pub fn global_ground_position() -> impl Strategy<Value = Vector3<f64>> {
    (latitude_deg(), longitude_deg())
        .prop_map(|(lat, lon)| spherical_to_cartesian(lat, lon, EARTH_RADIUS_KM))
}

/// Satellite above the generator cap
pub fn satellite_position() -> impl Strategy<Value = Vector3<f64>> {
    (cap_latitude_deg(), cap_longitude_deg(), altitude_km()).prop_map(|(lat, lon, alt)| {
        spherical_to_cartesian(lat, lon, EARTH_RADIUS_KM + alt)
    })
}

// ============================================================================
// Composite Generators
// ============================================================================

/// Generated layout: users and satellites in id order (index = id)
#[derive(Debug, Clone)]
pub struct Layout {
    pub users: Vec<Vector3<f64>>,
    pub sats: Vec<Vector3<f64>>,
}

/// Layout with user and satellite counts drawn from the given ranges
pub fn scenario(
    users: std::ops::Range<usize>,
    sats: std::ops::Range<usize>,
) -> impl Strategy<Value = Layout> {
    (
        prop::collection::vec(ground_position(), users),
        prop::collection::vec(satellite_position(), sats),
    )
        .prop_map(|(users, sats)| Layout { users, sats })
}

/// Dense layout: many users under few satellites, to exercise capacity limits
pub fn crowded_scenario() -> impl Strategy<Value = Layout> {
    scenario(60..150, 1..3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_below_nadir() {
        let sat = Vector3::new(0.0, 0.0, EARTH_RADIUS_KM + 1000.0);
        let p = point_below(&sat, 0.0, 0.0, EARTH_RADIUS_KM).unwrap();
        assert!((p - Vector3::new(0.0, 0.0, EARTH_RADIUS_KM)).norm() < 1e-6);
    }

    #[test]
    fn test_point_below_misses_past_horizon() {
        let sat = Vector3::new(0.0, 0.0, EARTH_RADIUS_KM + 1000.0);
        // Horizon nadir angle is asin(6371 / 7371) ≈ 59.8°
        assert!(point_below(&sat, 70.0, 0.0, EARTH_RADIUS_KM).is_none());
    }

    #[test]
    fn test_point_below_angle_preserved() {
        let sat = Vector3::new(3000.0, -2000.0, 6500.0);
        let a = point_below(&sat, 20.0, 0.0, EARTH_RADIUS_KM).unwrap();
        let b = point_below(&sat, 20.0, 180.0, EARTH_RADIUS_KM).unwrap();
        let cos = (a - sat).normalize().dot(&(b - sat).normalize());
        assert!((cos.acos().to_degrees() - 40.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn test_ground_position_on_surface(p in ground_position()) {
            prop_assert!((p.norm() - EARTH_RADIUS_KM).abs() < 1e-6);
        }

        #[test]
        fn test_global_position_on_surface(p in global_ground_position()) {
            prop_assert!((p.norm() - EARTH_RADIUS_KM).abs() < 1e-6);
        }

        #[test]
        fn test_satellite_above_surface(p in satellite_position()) {
            prop_assert!(p.norm() >= EARTH_RADIUS_KM + 500.0 - 1e-6);
            prop_assert!(p.norm() <= EARTH_RADIUS_KM + 2000.0 + 1e-6);
        }

        #[test]
        fn test_scenario_sizes(layout in scenario(1..10, 1..4)) {
            prop_assert!((1..10).contains(&layout.users.len()));
            prop_assert!((1..4).contains(&layout.sats.len()));
        }
    }
}
