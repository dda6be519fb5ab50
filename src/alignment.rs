//! Relative angle, alignment bands and the arrival deadzone

use crate::math::normalize_signed_degrees;
use crate::types::AlignmentThresholds;

/// Signed shortest rotation from `heading` to `bearing`
///
/// # Returns
/// `bearing - heading` normalized into `(-180, 180]`. Positive means the
/// target is clockwise (to the right) of the current heading.
///
/// # Example
/// ```
/// use lighthouse_nav::alignment::relative_angle;
///
/// assert_eq!(relative_angle(350.0, 10.0), 20.0);
/// assert_eq!(relative_angle(10.0, 350.0), -20.0);
/// ```
pub fn relative_angle(heading: f64, bearing: f64) -> f64 {
    normalize_signed_degrees(bearing - heading)
}

/// Apply the arrival deadzone to a raw distance
///
/// Returns `0` when the accuracy is known and the distance is strictly
/// inside it, otherwise the raw distance unchanged. Nothing is latched: the
/// rule is re-evaluated from live values every time.
///
/// # Example
/// ```
/// use lighthouse_nav::alignment::apply_deadzone;
///
/// assert_eq!(apply_deadzone(3.0, Some(5.0)), 0.0);
/// assert_eq!(apply_deadzone(8.0, Some(5.0)), 8.0);
/// assert_eq!(apply_deadzone(3.0, None), 3.0);
/// ```
pub fn apply_deadzone(distance_meters: f64, gps_accuracy_meters: Option<f64>) -> f64 {
    match gps_accuracy_meters {
        Some(accuracy) if distance_meters < accuracy => 0.0,
        _ => distance_meters,
    }
}

/// Discrete alignment band between heading and bearing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignmentBand {
    /// Pointing at the target
    Aligned,
    /// Turned partly toward the target
    Approaching,
    /// Facing away from the target
    OffCourse,
}

impl AlignmentBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentBand::Aligned => "aligned",
            AlignmentBand::Approaching => "approaching",
            AlignmentBand::OffCourse => "off-course",
        }
    }
}

impl core::fmt::Display for AlignmentBand {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alignment derived from a relative angle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alignment {
    /// Band membership
    pub band: AlignmentBand,
    /// Whether the heading is close enough to fire a haptic pulse
    pub haptic_cue: bool,
    /// `|relative angle|` scaled to `[0, 1]`; 0 is dead ahead, 1 is fully off course
    pub deviation: f64,
}

/// Classifies relative angles into alignment bands
///
/// # Example
/// ```
/// use lighthouse_nav::{AlignmentBand, AlignmentClassifier};
///
/// let classifier = AlignmentClassifier::default();
/// assert_eq!(classifier.band(-12.0), AlignmentBand::Aligned);
/// assert_eq!(classifier.band(30.0), AlignmentBand::Approaching);
/// assert_eq!(classifier.band(170.0), AlignmentBand::OffCourse);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AlignmentClassifier {
    thresholds: AlignmentThresholds,
}

impl AlignmentClassifier {
    pub fn new(thresholds: AlignmentThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> AlignmentThresholds {
        self.thresholds
    }

    /// Band for a relative angle in degrees
    pub fn band(&self, relative_angle: f64) -> AlignmentBand {
        let magnitude = relative_angle.abs();
        if magnitude < self.thresholds.aligned_degrees {
            AlignmentBand::Aligned
        } else if magnitude < self.thresholds.approaching_degrees {
            AlignmentBand::Approaching
        } else {
            AlignmentBand::OffCourse
        }
    }

    /// Full classification for a relative angle in degrees
    pub fn classify(&self, relative_angle: f64) -> Alignment {
        let magnitude = relative_angle.abs();
        Alignment {
            band: self.band(relative_angle),
            haptic_cue: magnitude < self.thresholds.haptic_degrees,
            deviation: (magnitude / self.thresholds.full_deviation_degrees).min(1.0),
        }
    }
}
