//! Great-circle bearing and distance on a spherical Earth

use crate::math::{DEG_TO_RAD, RAD_TO_DEG, normalize_degrees};
use crate::types::Coordinate;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Calculate the initial great-circle bearing from `from` to `to`
///
/// Uses the spherical forward-azimuth formula
/// `atan2(sinΔλ·cosφ2, cosφ1·sinφ2 − sinφ1·cosφ2·cosΔλ)`.
///
/// # Returns
/// Bearing in degrees, `[0, 360)`, 0° = north. Identical points return `0`.
///
/// # Example
/// ```
/// use lighthouse_nav::{Coordinate, geodesic::bearing};
///
/// let origin = Coordinate::new(0.0, 0.0);
/// let east = Coordinate::new(0.0, 1.0);
/// assert!((bearing(origin, east) - 90.0).abs() < 1e-9);
/// ```
pub fn bearing(from: Coordinate, to: Coordinate) -> f64 {
    if from == to {
        return 0.0;
    }

    let phi1 = from.latitude * DEG_TO_RAD;
    let phi2 = to.latitude * DEG_TO_RAD;
    let delta_lambda = (to.longitude - from.longitude) * DEG_TO_RAD;

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_degrees(y.atan2(x) * RAD_TO_DEG)
}

/// Calculate the great-circle distance between two coordinates
///
/// Haversine formula with [`EARTH_RADIUS_METERS`].
///
/// # Returns
/// Distance in meters, never negative
///
/// # Example
/// ```
/// use lighthouse_nav::{Coordinate, geodesic::distance};
///
/// let origin = Coordinate::new(0.0, 0.0);
/// let east = Coordinate::new(0.0, 1.0);
/// assert!((distance(origin, east) - 111_195.0).abs() < 1.0);
/// ```
pub fn distance(from: Coordinate, to: Coordinate) -> f64 {
    let phi1 = from.latitude * DEG_TO_RAD;
    let phi2 = to.latitude * DEG_TO_RAD;
    let delta_phi = (to.latitude - from.latitude) * DEG_TO_RAD;
    let delta_lambda = (to.longitude - from.longitude) * DEG_TO_RAD;

    let half_chord = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);

    // Rounding can push the chord a hair past 1 for antipodal points
    let half_chord = half_chord.clamp(0.0, 1.0);
    let angular_distance = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());

    EARTH_RADIUS_METERS * angular_distance
}
