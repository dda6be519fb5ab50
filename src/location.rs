//! Sliding-window smoothing of raw position fixes

use nalgebra::Vector2;

use crate::types::{Coordinate, RawFix, SmoothedLocation};
use crate::window::SampleWindow;

/// Number of fixes averaged by default
pub const GPS_SAMPLE_SIZE: usize = 5;

/// Location smoother
///
/// Keeps the most recent fixes in a FIFO window and reports their arithmetic
/// mean. Accuracy is taken from the latest fix only, so a fresh precise fix
/// reports good accuracy even while older, noisier fixes still pull on the
/// mean.
#[derive(Debug, Clone)]
pub struct LocationSmoother {
    /// Buffered coordinates as `(latitude, longitude)`
    window: SampleWindow<Vector2<f64>>,
    /// Accuracy of the latest fix
    latest_accuracy: Option<f64>,
    /// Timestamp of the latest fix
    latest_timestamp_ms: u64,
}

impl LocationSmoother {
    /// Create a smoother averaging up to `capacity` fixes
    ///
    /// # Example
    /// ```
    /// use lighthouse_nav::{Coordinate, LocationSmoother, RawFix};
    ///
    /// let mut smoother = LocationSmoother::new(5);
    /// smoother.update(RawFix::new(Coordinate::new(10.0, 20.0), Some(4.0), 0));
    /// let smoothed = smoother.update(RawFix::new(Coordinate::new(12.0, 22.0), None, 1000));
    ///
    /// assert_eq!(smoothed.coordinate, Coordinate::new(11.0, 21.0));
    /// assert_eq!(smoothed.accuracy_meters, None);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            window: SampleWindow::new(capacity),
            latest_accuracy: None,
            latest_timestamp_ms: 0,
        }
    }

    /// Add a fix and return the updated smoothed location
    pub fn update(&mut self, fix: RawFix) -> SmoothedLocation {
        let sample = Vector2::new(fix.coordinate.latitude, fix.coordinate.longitude);
        self.window.push(sample);
        self.latest_accuracy = fix.accuracy_meters;
        self.latest_timestamp_ms = fix.timestamp_ms;

        SmoothedLocation {
            coordinate: self.mean_coordinate(),
            accuracy_meters: self.latest_accuracy,
            timestamp_ms: self.latest_timestamp_ms,
        }
    }

    /// Current smoothed location, `None` before the first fix
    pub fn smoothed(&self) -> Option<SmoothedLocation> {
        if self.window.is_empty() {
            return None;
        }

        Some(SmoothedLocation {
            coordinate: self.mean_coordinate(),
            accuracy_meters: self.latest_accuracy,
            timestamp_ms: self.latest_timestamp_ms,
        })
    }

    /// Discard all buffered fixes
    pub fn reset(&mut self) {
        self.window.clear();
        self.latest_accuracy = None;
        self.latest_timestamp_ms = 0;
    }

    /// Number of fixes currently buffered
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    fn mean_coordinate(&self) -> Coordinate {
        // A single fix is passed through untouched
        if self.window.len() == 1
            && let Some(only) = self.window.latest()
        {
            return Coordinate::new(only.x, only.y);
        }

        let sum: Vector2<f64> = self.window.iter().sum();
        let mean = sum / self.window.len() as f64;
        Coordinate::new(mean.x, mean.y)
    }
}

impl Default for LocationSmoother {
    fn default() -> Self {
        Self::new(GPS_SAMPLE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(latitude: f64, longitude: f64, accuracy: Option<f64>) -> RawFix {
        RawFix::new(Coordinate::new(latitude, longitude), accuracy, 0)
    }

    #[test]
    fn test_empty_smoother_has_no_location() {
        let smoother = LocationSmoother::default();
        assert!(smoother.smoothed().is_none());
        assert!(smoother.is_empty());
        assert_eq!(smoother.capacity(), GPS_SAMPLE_SIZE);
    }

    #[test]
    fn test_single_fix_passes_through() {
        let mut smoother = LocationSmoother::default();
        let raw = Coordinate::new(37.774929, -122.419416);
        let smoothed = smoother.update(RawFix::new(raw, Some(8.0), 42));

        assert_eq!(smoothed.coordinate, raw);
        assert_eq!(smoothed.accuracy_meters, Some(8.0));
        assert_eq!(smoothed.timestamp_ms, 42);
    }

    #[test]
    fn test_mean_of_buffered_fixes() {
        let mut smoother = LocationSmoother::default();
        smoother.update(fix(1.0, 10.0, Some(5.0)));
        smoother.update(fix(2.0, 20.0, Some(5.0)));
        let smoothed = smoother.update(fix(3.0, 30.0, Some(5.0)));

        assert!((smoothed.coordinate.latitude - 2.0).abs() < 1e-12);
        assert!((smoothed.coordinate.longitude - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_evicts_oldest_fix() {
        let mut smoother = LocationSmoother::default();

        // A far outlier followed by five clean fixes
        smoother.update(fix(90.0, 90.0, Some(50.0)));
        for _ in 0..GPS_SAMPLE_SIZE {
            smoother.update(fix(1.0, 1.0, Some(3.0)));
        }

        assert_eq!(smoother.len(), GPS_SAMPLE_SIZE);
        let smoothed = smoother.smoothed().unwrap();
        assert!((smoothed.coordinate.latitude - 1.0).abs() < 1e-12);
        assert!((smoothed.coordinate.longitude - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_is_latest_not_averaged() {
        let mut smoother = LocationSmoother::default();
        smoother.update(fix(0.0, 0.0, Some(100.0)));
        let smoothed = smoother.update(fix(0.0, 0.0, Some(4.0)));
        assert_eq!(smoothed.accuracy_meters, Some(4.0));

        // Unknown accuracy stays unknown
        let smoothed = smoother.update(fix(0.0, 0.0, None));
        assert_eq!(smoothed.accuracy_meters, None);
    }

    #[test]
    fn test_reset_clears_window() {
        let mut smoother = LocationSmoother::default();
        smoother.update(fix(5.0, 5.0, Some(1.0)));
        smoother.reset();

        assert!(smoother.smoothed().is_none());

        let smoothed = smoother.update(fix(-5.0, -5.0, None));
        assert_eq!(smoothed.coordinate, Coordinate::new(-5.0, -5.0));
    }
}
