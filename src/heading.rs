//! Circular-mean smoothing of compass heading samples

use nalgebra::Vector2;

use crate::math::{heading_to_unit, normalize_degrees, unit_to_heading};
use crate::types::{RawHeadingSample, SmoothedHeading};
use crate::window::SampleWindow;

/// Number of heading samples averaged by default
pub const HEADING_SAMPLE_SIZE: usize = 8;

/// Mean resultant length below which the samples are treated as cancelling
const CANCELLATION_EPSILON: f64 = 1e-9;

/// Calculate the circular mean of a set of headings
///
/// Each heading is decomposed into a `(sin θ, cos θ)` unit vector, the
/// components are averaged independently and `atan2` recovers the angle. An
/// arithmetic mean would put the average of 350° and 10° at 180°; the
/// circular mean correctly gives 0°.
///
/// # Returns
/// Mean heading in degrees, `[0, 360)`, or `None` for an empty input. When
/// the vectors cancel (e.g. 0° and 180°) there is no mean direction and the
/// result is `0`.
///
/// # Example
/// ```
/// use lighthouse_nav::heading::circular_mean;
///
/// let mean = circular_mean([350.0, 10.0]).unwrap();
/// assert!(mean < 1e-9 || (360.0 - mean) < 1e-9);
/// ```
pub fn circular_mean<I>(headings: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut count = 0usize;
    let mut first = 0.0;
    let sum = headings
        .into_iter()
        .fold(Vector2::zeros(), |acc: Vector2<f64>, degrees| {
            if count == 0 {
                first = degrees;
            }
            count += 1;
            acc + heading_to_unit(degrees)
        });

    match count {
        0 => None,
        // A single sample is reported exactly, without the sin/cos round trip
        1 => Some(normalize_degrees(first)),
        _ => {
            let mean = sum / count as f64;
            if mean.norm() < CANCELLATION_EPSILON {
                // sin(180°) is not exactly zero, so atan2 would pick an arbitrary axis
                Some(0.0)
            } else {
                Some(unit_to_heading(mean))
            }
        }
    }
}

/// Heading smoother
///
/// Keeps the most recent headings in a FIFO window and reports their circular
/// mean. Accuracy is taken from the latest sample only.
#[derive(Debug, Clone)]
pub struct HeadingSmoother {
    /// Buffered headings in degrees
    window: SampleWindow<f64>,
    /// Accuracy of the latest sample
    latest_accuracy: f64,
}

impl HeadingSmoother {
    /// Create a smoother averaging up to `capacity` samples
    ///
    /// # Example
    /// ```
    /// use lighthouse_nav::{HeadingSmoother, RawHeadingSample};
    ///
    /// let mut smoother = HeadingSmoother::new(8);
    /// smoother.update(RawHeadingSample::true_north(350.0, 5.0));
    /// let smoothed = smoother.update(RawHeadingSample::true_north(10.0, 5.0));
    ///
    /// assert!(smoothed.degrees < 1e-9 || 360.0 - smoothed.degrees < 1e-9);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            window: SampleWindow::new(capacity),
            latest_accuracy: 0.0,
        }
    }

    /// Add a sample and return the updated smoothed heading
    ///
    /// The true heading is used unless it carries the invalid sentinel, in
    /// which case the magnetic heading is buffered instead.
    pub fn update(&mut self, sample: RawHeadingSample) -> SmoothedHeading {
        if !sample.has_true_heading() {
            tracing::trace!(
                magnetic = sample.magnetic_heading,
                "true heading unavailable, using magnetic heading"
            );
        }

        self.push_degrees(sample.resolved_degrees(), sample.accuracy_degrees)
    }

    /// Add an already-resolved heading in degrees
    pub fn push_degrees(&mut self, degrees: f64, accuracy_degrees: f64) -> SmoothedHeading {
        self.window.push(degrees);
        self.latest_accuracy = accuracy_degrees;

        SmoothedHeading {
            degrees: self.mean_heading(),
            accuracy_degrees: self.latest_accuracy,
        }
    }

    /// Current smoothed heading, `None` before the first sample
    pub fn smoothed(&self) -> Option<SmoothedHeading> {
        if self.window.is_empty() {
            return None;
        }

        Some(SmoothedHeading {
            degrees: self.mean_heading(),
            accuracy_degrees: self.latest_accuracy,
        })
    }

    /// Discard all buffered samples
    pub fn reset(&mut self) {
        self.window.clear();
        self.latest_accuracy = 0.0;
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    fn mean_heading(&self) -> f64 {
        circular_mean(self.window.iter().copied()).unwrap_or(0.0)
    }
}

impl Default for HeadingSmoother {
    fn default() -> Self {
        Self::new(HEADING_SAMPLE_SIZE)
    }
}
