//! Angle helpers shared by the geodesic, heading and alignment modules

use nalgebra::Vector2;

/// Mathematical constants
pub const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;
pub const RAD_TO_DEG: f64 = 180.0 / core::f64::consts::PI;

/// Normalize an angle in degrees into `[0, 360)`
///
/// Uses `(x + 360) mod 360` so that the values produced by `atan2` land in
/// range. Inputs further than one turn outside the range are wrapped with
/// `rem_euclid` as well.
///
/// # Example
/// ```
/// use lighthouse_nav::math::normalize_degrees;
///
/// assert_eq!(normalize_degrees(-90.0), 270.0);
/// assert_eq!(normalize_degrees(360.0), 0.0);
/// ```
pub fn normalize_degrees(degrees: f64) -> f64 {
    // In-range values are returned bit-for-bit
    if (0.0..360.0).contains(&degrees) {
        return degrees;
    }

    let wrapped = (degrees + 360.0) % 360.0;
    let wrapped = if wrapped < 0.0 {
        wrapped.rem_euclid(360.0)
    } else {
        wrapped
    };

    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Normalize an angle in degrees into `(-180, 180]`
///
/// Adds or subtracts whole turns until the value is in range, so `-180`
/// maps to `180` and never the other way round.
///
/// # Example
/// ```
/// use lighthouse_nav::math::normalize_signed_degrees;
///
/// assert_eq!(normalize_signed_degrees(270.0), -90.0);
/// assert_eq!(normalize_signed_degrees(-180.0), 180.0);
/// ```
pub fn normalize_signed_degrees(degrees: f64) -> f64 {
    let mut diff = degrees;
    if diff.abs() > 720.0 {
        // Skip the loop for values many turns out
        diff %= 360.0;
    }
    while diff <= -180.0 {
        diff += 360.0;
    }
    while diff > 180.0 {
        diff -= 360.0;
    }
    diff
}

/// Convert a compass heading in degrees into a unit vector `(sin θ, cos θ)`
///
/// The x component points east and the y component points north, so the
/// components can be averaged independently for a circular mean.
pub fn heading_to_unit(degrees: f64) -> Vector2<f64> {
    let radians = degrees * DEG_TO_RAD;
    Vector2::new(radians.sin(), radians.cos())
}

/// Convert an (unnormalized) `(sin, cos)` vector back into a heading in `[0, 360)`
///
/// An exact zero vector gives `0` rather than NaN, since `atan2(0, 0)` is `0`.
/// Vectors that only nearly cancel still produce an arbitrary direction;
/// [`circular_mean`](crate::heading::circular_mean) handles that case.
pub fn unit_to_heading(vector: Vector2<f64>) -> f64 {
    normalize_degrees(vector.x.atan2(vector.y) * RAD_TO_DEG)
}
