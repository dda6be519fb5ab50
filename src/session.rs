//! Tracking session orchestrating smoothing, geodesy and alignment

use tracing::{debug, info, trace, warn};

use crate::alignment::{AlignmentClassifier, apply_deadzone, relative_angle};
use crate::error::{Result, TrackingError};
use crate::geodesic;
use crate::heading::HeadingSmoother;
use crate::location::LocationSmoother;
use crate::sensor::{SensorHub, SensorSubscriptions};
use crate::types::{
    Coordinate, Permission, RawFix, RawHeadingSample, SmoothedHeading, SmoothedLocation,
    SpatialSnapshot, TrackingSettings,
};

/// Session lifecycle
///
/// ```text
/// Unstarted --(permission granted)--> Active --(teardown)--> Stopped
/// Unstarted --(permission denied)---> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionState {
    /// Waiting for the permission signal
    Unstarted,
    /// Subscribed to both sensor streams
    Active,
    /// Torn down; subscriptions released
    Stopped,
    /// Permission denied; terminal
    Failed,
}

/// Consumer of session output
///
/// Called synchronously from whichever handler produced the snapshot. Any
/// `FnMut(&SpatialSnapshot)` closure is a listener.
pub trait SnapshotListener {
    fn on_snapshot(&mut self, snapshot: &SpatialSnapshot);

    /// Called once if the session fails to start
    fn on_failure(&mut self, _error: &TrackingError) {}
}

impl<F> SnapshotListener for F
where
    F: FnMut(&SpatialSnapshot),
{
    fn on_snapshot(&mut self, snapshot: &SpatialSnapshot) {
        self(snapshot)
    }
}

/// Navigation tracking session
///
/// Owns the two smoothers, the sensor subscriptions and the current target.
/// Every position event, heading event or target change recomputes a
/// [`SpatialSnapshot`] from the latest cached values and pushes it to the
/// registered listeners. All mutation happens inside the handler for the
/// event that caused it, so a snapshot never mixes old and new values.
///
/// # Example
/// ```
/// use lighthouse_nav::{
///     Coordinate, Permission, RawFix, RawHeadingSample, SensorHub, Subscription,
///     TrackingSession,
/// };
///
/// struct Noop;
/// impl Subscription for Noop {
///     fn remove(&mut self) {}
/// }
/// struct Platform;
/// impl SensorHub for Platform {
///     fn watch_position(&mut self) -> Box<dyn Subscription> { Box::new(Noop) }
///     fn watch_heading(&mut self) -> Box<dyn Subscription> { Box::new(Noop) }
/// }
///
/// let mut session = TrackingSession::new();
/// session.start(Permission::Granted, &mut Platform).unwrap();
/// session.set_target(Some(Coordinate::new(0.0, 1.0)));
///
/// session.on_fix(RawFix::new(Coordinate::new(0.0, 0.0), Some(5.0), 0));
/// let snapshot = session.on_heading(RawHeadingSample::true_north(90.0, 3.0)).unwrap();
///
/// assert!((snapshot.bearing.unwrap() - 90.0).abs() < 1e-9);
/// assert!(snapshot.relative_angle.unwrap().abs() < 1e-9);
/// ```
pub struct TrackingSession {
    /// Session settings
    settings: TrackingSettings,
    /// Lifecycle state
    state: SessionState,
    /// Position window
    location_smoother: LocationSmoother,
    /// Heading window
    heading_smoother: HeadingSmoother,
    /// Band classifier built from the settings thresholds
    classifier: AlignmentClassifier,
    /// Current target, read fresh on every recomputation
    target: Option<Coordinate>,
    /// Latest smoothed position
    last_location: Option<SmoothedLocation>,
    /// Latest smoothed heading
    last_heading: Option<SmoothedHeading>,
    /// Most recently emitted snapshot
    snapshot: SpatialSnapshot,
    /// Live sensor subscriptions while active
    subscriptions: Option<SensorSubscriptions>,
    /// Snapshot consumers
    listeners: Vec<Box<dyn SnapshotListener>>,
}

impl TrackingSession {
    /// Create a session with default settings
    pub fn new() -> Self {
        Self::from_valid_settings(TrackingSettings::default())
    }

    /// Create a session with the given settings
    ///
    /// # Errors
    /// [`TrackingError::InvalidSettings`] if the settings fail validation
    pub fn with_settings(settings: TrackingSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::from_valid_settings(settings))
    }

    fn from_valid_settings(settings: TrackingSettings) -> Self {
        Self {
            settings,
            state: SessionState::Unstarted,
            location_smoother: LocationSmoother::new(settings.gps_sample_size),
            heading_smoother: HeadingSmoother::new(settings.heading_sample_size),
            classifier: AlignmentClassifier::new(settings.thresholds),
            target: None,
            last_location: None,
            last_heading: None,
            snapshot: SpatialSnapshot::default(),
            subscriptions: None,
            listeners: Vec::new(),
        }
    }

    /// Register a snapshot consumer
    pub fn add_listener(&mut self, listener: Box<dyn SnapshotListener>) {
        self.listeners.push(listener);
    }

    /// Start tracking once the permission outcome is known
    ///
    /// With [`Permission::Granted`] both sensor streams are subscribed and the
    /// session becomes active. With [`Permission::Denied`] the hub is never
    /// touched, listeners are notified once and the session fails for good.
    ///
    /// # Errors
    /// - [`TrackingError::PermissionDenied`] when permission was denied
    /// - [`TrackingError::InvalidTransition`] if the session was already started,
    ///   stopped or failed
    pub fn start(&mut self, permission: Permission, hub: &mut dyn SensorHub) -> Result<()> {
        if self.state != SessionState::Unstarted {
            return Err(TrackingError::InvalidTransition {
                from: self.state,
                action: "start",
            });
        }

        match permission {
            Permission::Denied => {
                self.state = SessionState::Failed;
                warn!("location permission denied, tracking session failed");

                let error = TrackingError::PermissionDenied;
                for listener in &mut self.listeners {
                    listener.on_failure(&error);
                }
                Err(error)
            }
            Permission::Granted => {
                self.location_smoother.reset();
                self.heading_smoother.reset();
                self.subscriptions = Some(SensorSubscriptions::acquire(hub));
                self.state = SessionState::Active;

                info!(
                    gps_sample_size = self.settings.gps_sample_size,
                    heading_sample_size = self.settings.heading_sample_size,
                    "tracking session started"
                );
                Ok(())
            }
        }
    }

    /// Handle a position fix from the location stream
    ///
    /// # Returns
    /// The new snapshot, or `None` if the session is not active
    pub fn on_fix(&mut self, fix: RawFix) -> Option<SpatialSnapshot> {
        if self.state != SessionState::Active {
            trace!(state = ?self.state, "dropping position fix outside active session");
            return None;
        }

        self.last_location = Some(self.location_smoother.update(fix));
        Some(self.recompute())
    }

    /// Handle a heading sample from the compass stream
    ///
    /// # Returns
    /// The new snapshot, or `None` if the session is not active
    pub fn on_heading(&mut self, sample: RawHeadingSample) -> Option<SpatialSnapshot> {
        if self.state != SessionState::Active {
            trace!(state = ?self.state, "dropping heading sample outside active session");
            return None;
        }

        self.last_heading = Some(self.heading_smoother.update(sample));
        Some(self.recompute())
    }

    /// Set, replace or clear the target
    ///
    /// The target is stored in any state. While active, a snapshot is
    /// recomputed immediately from the last known location and heading.
    pub fn set_target(&mut self, target: Option<Coordinate>) -> Option<SpatialSnapshot> {
        self.target = target;
        match target {
            Some(coordinate) => info!(
                latitude = coordinate.latitude,
                longitude = coordinate.longitude,
                "target set"
            ),
            None => info!("target cleared"),
        }

        if self.state == SessionState::Active {
            Some(self.recompute())
        } else {
            None
        }
    }

    /// Drop a beacon at the current smoothed location
    ///
    /// # Returns
    /// The coordinate now used as target, or `None` (target unchanged) if no
    /// fix has been received yet
    pub fn mark_current_location(&mut self) -> Option<Coordinate> {
        let here = self.last_location?.coordinate;
        self.set_target(Some(here));
        Some(here)
    }

    /// Stop tracking and release both sensor streams
    ///
    /// Safe to call repeatedly and on a session that never started.
    pub fn teardown(&mut self) {
        match self.state {
            SessionState::Active => {
                if let Some(mut subscriptions) = self.subscriptions.take() {
                    subscriptions.cancel();
                }
                self.location_smoother.reset();
                self.heading_smoother.reset();
                self.last_location = None;
                self.last_heading = None;
                self.snapshot = SpatialSnapshot {
                    target: self.target,
                    ..Default::default()
                };
                self.state = SessionState::Stopped;
                info!("tracking session stopped");
            }
            SessionState::Unstarted => {
                self.state = SessionState::Stopped;
            }
            SessionState::Stopped | SessionState::Failed => {}
        }
    }

    /// Get the most recently emitted snapshot
    pub fn snapshot(&self) -> SpatialSnapshot {
        self.snapshot
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn target(&self) -> Option<Coordinate> {
        self.target
    }

    pub fn location(&self) -> Option<SmoothedLocation> {
        self.last_location
    }

    pub fn heading(&self) -> Option<SmoothedHeading> {
        self.last_heading
    }

    pub fn settings(&self) -> TrackingSettings {
        self.settings
    }

    /// Build a snapshot from cached values without emitting it
    fn compute_snapshot(&self) -> SpatialSnapshot {
        let target = self.target;
        let location = self.last_location;
        let heading = self.last_heading;

        let (bearing, distance_meters) = match (location, target) {
            (Some(location), Some(target)) => {
                let bearing = geodesic::bearing(location.coordinate, target);
                let raw_distance = geodesic::distance(location.coordinate, target);
                (
                    Some(bearing),
                    Some(apply_deadzone(raw_distance, location.accuracy_meters)),
                )
            }
            _ => (None, None),
        };

        let relative_angle = match (heading, bearing) {
            (Some(heading), Some(bearing)) => Some(relative_angle(heading.degrees, bearing)),
            _ => None,
        };

        SpatialSnapshot {
            location,
            heading,
            target,
            bearing,
            distance_meters,
            relative_angle,
            alignment: relative_angle.map(|angle| self.classifier.classify(angle)),
        }
    }

    /// Recompute, store and publish a snapshot
    fn recompute(&mut self) -> SpatialSnapshot {
        let snapshot = self.compute_snapshot();
        self.snapshot = snapshot;

        debug!(
            bearing = ?snapshot.bearing,
            distance_meters = ?snapshot.distance_meters,
            relative_angle = ?snapshot.relative_angle,
            band = ?snapshot.alignment.map(|alignment| alignment.band),
            "snapshot updated"
        );

        for listener in &mut self.listeners {
            listener.on_snapshot(&snapshot);
        }
        snapshot
    }
}

impl Default for TrackingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
