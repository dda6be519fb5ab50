//! Sensor stream subscriptions
//!
//! The host platform owns the actual location and compass APIs. A session
//! only asks a [`SensorHub`] to start each stream and keeps the returned
//! [`Subscription`] handles; the host's event loop then forwards delivered
//! events to [`TrackingSession::on_fix`](crate::TrackingSession::on_fix) and
//! [`TrackingSession::on_heading`](crate::TrackingSession::on_heading).

/// Live registration with one sensor stream
///
/// `remove` stops delivery. It may be called more than once.
pub trait Subscription {
    fn remove(&mut self);
}

/// Source of the two sensor streams
///
/// # Example
/// ```
/// use lighthouse_nav::{SensorHub, Subscription};
///
/// struct Noop;
/// impl Subscription for Noop {
///     fn remove(&mut self) {}
/// }
///
/// struct Platform;
/// impl SensorHub for Platform {
///     fn watch_position(&mut self) -> Box<dyn Subscription> {
///         Box::new(Noop)
///     }
///     fn watch_heading(&mut self) -> Box<dyn Subscription> {
///         Box::new(Noop)
///     }
/// }
/// ```
pub trait SensorHub {
    /// Start delivering position fixes
    fn watch_position(&mut self) -> Box<dyn Subscription>;

    /// Start delivering heading samples
    fn watch_heading(&mut self) -> Box<dyn Subscription>;
}

/// Single cancellation handle covering both sensor streams
///
/// Both subscriptions are removed by [`cancel`](Self::cancel) or, failing
/// that, when the handle is dropped.
pub struct SensorSubscriptions {
    position: Option<Box<dyn Subscription>>,
    heading: Option<Box<dyn Subscription>>,
}

impl SensorSubscriptions {
    /// Subscribe to position then heading
    pub fn acquire(hub: &mut dyn SensorHub) -> Self {
        let position = hub.watch_position();
        let heading = hub.watch_heading();
        Self {
            position: Some(position),
            heading: Some(heading),
        }
    }

    /// Whether either stream is still subscribed
    pub fn is_active(&self) -> bool {
        self.position.is_some() || self.heading.is_some()
    }

    /// Remove both subscriptions; later calls do nothing
    pub fn cancel(&mut self) {
        if let Some(mut position) = self.position.take() {
            position.remove();
        }
        if let Some(mut heading) = self.heading.take() {
            heading.remove();
        }
    }
}

impl Drop for SensorSubscriptions {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl core::fmt::Debug for SensorSubscriptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SensorSubscriptions")
            .field("position", &self.position.is_some())
            .field("heading", &self.heading.is_some())
            .finish()
    }
}
