//! Core data model and settings for the navigation core

use crate::alignment::Alignment;
use crate::error::{Result, TrackingError};
use crate::heading::HEADING_SAMPLE_SIZE;
use crate::location::GPS_SAMPLE_SIZE;

/// Sentinel reported by the heading sensor when true heading is unavailable
///
/// When a sample carries this value the magnetic heading is used instead.
pub const INVALID_TRUE_HEADING: f64 = -1.0;

/// Geographic coordinate in degrees
///
/// The Earth is treated as a perfect sphere (see
/// [`EARTH_RADIUS_METERS`](crate::geodesic::EARTH_RADIUS_METERS)). Latitude and
/// longitude are not validated; NaN or out-of-range values give meaningless
/// results.
///
/// # Example
/// ```
/// use lighthouse_nav::Coordinate;
///
/// let lighthouse = Coordinate::new(50.3656, -4.1425);
/// assert_eq!(lighthouse.latitude, 50.3656);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Raw position fix delivered by the location sensor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawFix {
    /// Reported position
    pub coordinate: Coordinate,
    /// Horizontal accuracy radius in meters
    ///
    /// `None` while the receiver has not converged. Unknown accuracy is never
    /// replaced by zero or infinity.
    pub accuracy_meters: Option<f64>,
    /// Fix time in milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

impl RawFix {
    pub fn new(coordinate: Coordinate, accuracy_meters: Option<f64>, timestamp_ms: u64) -> Self {
        Self {
            coordinate,
            accuracy_meters,
            timestamp_ms,
        }
    }
}

/// Raw heading sample delivered by the compass
///
/// # Example
/// ```
/// use lighthouse_nav::RawHeadingSample;
///
/// // True heading unavailable, magnetic heading is used
/// let sample = RawHeadingSample::new(-1.0, 93.0, 5.0);
/// assert_eq!(sample.resolved_degrees(), 93.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawHeadingSample {
    /// True-north heading in `[0, 360)`, or [`INVALID_TRUE_HEADING`]
    pub true_heading: f64,
    /// Magnetic-north heading in `[0, 360)`
    pub magnetic_heading: f64,
    /// Sensor accuracy estimate in degrees
    pub accuracy_degrees: f64,
}

impl RawHeadingSample {
    pub fn new(true_heading: f64, magnetic_heading: f64, accuracy_degrees: f64) -> Self {
        Self {
            true_heading,
            magnetic_heading,
            accuracy_degrees,
        }
    }

    /// Sample that only carries a true heading
    pub fn true_north(degrees: f64, accuracy_degrees: f64) -> Self {
        Self::new(degrees, degrees, accuracy_degrees)
    }

    /// Whether the true heading is the invalid sentinel
    pub fn has_true_heading(&self) -> bool {
        self.true_heading != INVALID_TRUE_HEADING
    }

    /// Heading to feed into smoothing, falling back to magnetic heading
    pub fn resolved_degrees(&self) -> f64 {
        if self.has_true_heading() {
            self.true_heading
        } else {
            self.magnetic_heading
        }
    }
}

/// Smoothed position produced by the location smoother
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmoothedLocation {
    /// Mean of the buffered fixes
    pub coordinate: Coordinate,
    /// Accuracy of the most recent raw fix, not averaged
    pub accuracy_meters: Option<f64>,
    /// Timestamp of the most recent raw fix
    pub timestamp_ms: u64,
}

/// Smoothed heading produced by the heading smoother
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmoothedHeading {
    /// Circular mean of the buffered samples, in `[0, 360)`
    pub degrees: f64,
    /// Accuracy of the most recent raw sample, not averaged
    pub accuracy_degrees: f64,
}

/// Immutable navigation state emitted after every recomputation
///
/// Every field is `None` while the value it depends on is unknown: no fix
/// yet, no heading yet, or no target.
///
/// # Example
/// ```
/// use lighthouse_nav::SpatialSnapshot;
///
/// let snapshot = SpatialSnapshot::default();
/// assert!(snapshot.location.is_none());
/// assert!(!snapshot.is_arrived());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpatialSnapshot {
    /// Smoothed position
    pub location: Option<SmoothedLocation>,
    /// Smoothed heading
    pub heading: Option<SmoothedHeading>,
    /// Target the navigation fields were computed against
    pub target: Option<Coordinate>,
    /// Great-circle bearing to the target in `[0, 360)`
    pub bearing: Option<f64>,
    /// Distance to the target in meters, `0` inside the arrival deadzone
    pub distance_meters: Option<f64>,
    /// `bearing - heading` in `(-180, 180]`
    pub relative_angle: Option<f64>,
    /// Alignment classification, present whenever `relative_angle` is
    pub alignment: Option<Alignment>,
}

impl SpatialSnapshot {
    /// Whether the target is inside the current GPS accuracy radius
    pub fn is_arrived(&self) -> bool {
        self.distance_meters == Some(0.0)
    }
}

/// Outcome of the one-time sensor permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Permission {
    Granted,
    Denied,
}

impl From<bool> for Permission {
    fn from(granted: bool) -> Self {
        if granted {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }
}

/// Angular thresholds used to classify alignment
///
/// Bands are half-open: a relative angle of exactly `aligned_degrees` is
/// classified as approaching, not aligned.
///
/// # Example
/// ```
/// use lighthouse_nav::AlignmentThresholds;
///
/// let thresholds = AlignmentThresholds {
///     aligned_degrees: 10.0,
///     ..Default::default()
/// };
/// assert_eq!(thresholds.approaching_degrees, 45.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentThresholds {
    /// `|relative angle|` below this is aligned (default 15°)
    pub aligned_degrees: f64,
    /// `|relative angle|` below this is approaching (default 45°)
    pub approaching_degrees: f64,
    /// `|relative angle|` below this fires a haptic cue (default 10°)
    pub haptic_degrees: f64,
    /// `|relative angle|` at which the deviation ratio saturates at 1 (default 90°)
    pub full_deviation_degrees: f64,
}

impl Default for AlignmentThresholds {
    fn default() -> Self {
        Self {
            aligned_degrees: 15.0,
            approaching_degrees: 45.0,
            haptic_degrees: 10.0,
            full_deviation_degrees: 90.0,
        }
    }
}

/// Tracking session settings
///
/// # Example
/// ```
/// use lighthouse_nav::{TrackingSession, TrackingSettings};
///
/// let settings = TrackingSettings {
///     heading_sample_size: 16, // steadier needle, slower response
///     ..Default::default()
/// };
/// let session = TrackingSession::with_settings(settings).unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackingSettings {
    /// Number of fixes averaged by the location smoother
    pub gps_sample_size: usize,
    /// Number of samples averaged by the heading smoother
    pub heading_sample_size: usize,
    /// Alignment band thresholds
    pub thresholds: AlignmentThresholds,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            gps_sample_size: GPS_SAMPLE_SIZE,
            heading_sample_size: HEADING_SAMPLE_SIZE,
            thresholds: AlignmentThresholds::default(),
        }
    }
}

impl TrackingSettings {
    /// Check that the settings describe a usable session
    pub fn validate(&self) -> Result<()> {
        if self.gps_sample_size == 0 {
            return Err(TrackingError::InvalidSettings(
                "gps_sample_size must be at least 1".into(),
            ));
        }
        if self.heading_sample_size == 0 {
            return Err(TrackingError::InvalidSettings(
                "heading_sample_size must be at least 1".into(),
            ));
        }

        let thresholds = &self.thresholds;
        let named = [
            ("aligned_degrees", thresholds.aligned_degrees),
            ("approaching_degrees", thresholds.approaching_degrees),
            ("haptic_degrees", thresholds.haptic_degrees),
            ("full_deviation_degrees", thresholds.full_deviation_degrees),
        ];
        for (name, value) in named {
            if !value.is_finite() || value <= 0.0 {
                return Err(TrackingError::InvalidSettings(format!(
                    "{name} must be a positive finite angle, got {value}"
                )));
            }
        }

        if thresholds.aligned_degrees > thresholds.approaching_degrees {
            return Err(TrackingError::InvalidSettings(format!(
                "aligned_degrees ({}) exceeds approaching_degrees ({})",
                thresholds.aligned_degrees, thresholds.approaching_degrees
            )));
        }

        Ok(())
    }
}
