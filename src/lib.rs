//! [![crates-io]](https://crates.io/crates/lighthouse-nav)&ensp;[![license]](https://opensource.org/licenses/MIT)
//!
//! [crates-io]: https://img.shields.io/badge/crates.io-fc8d62?style=for-the-badge&labelColor=555555&logo=rust
//! [license]: https://img.shields.io/badge/License-MIT-blue.svg?style=for-the-badge&labelColor=555555
//!
//! Lighthouse Nav - a real-time navigation core for point-to-target guidance
//!
//! This library turns two independent, noisy sensor streams (position fixes
//! and compass heading samples) into a stable navigation signal: a smoothed
//! position, a smoothed heading, the bearing and distance to a settable
//! target, and a discrete alignment classification suitable for driving
//! directional or haptic feedback.
//!
//! # Features
//!
//! - Great-circle bearing and Haversine distance on a spherical Earth
//! - Fixed-window position averaging
//! - Circular-mean heading smoothing that is stable across north (0°/360°)
//! - Aligned / approaching / off-course classification with configurable thresholds
//! - Non-latching arrival deadzone based on live GPS accuracy
//! - Session orchestration with scoped sensor subscriptions and immediate retargeting
//!
//! # Quick Start
//!
//! ```rust
//! use lighthouse_nav::{
//!     AlignmentBand, Coordinate, Permission, RawFix, RawHeadingSample, SensorHub,
//!     Subscription, TrackingSession,
//! };
//!
//! // The host platform's sensor APIs
//! struct Handle;
//! impl Subscription for Handle {
//!     fn remove(&mut self) {}
//! }
//! struct Sensors;
//! impl SensorHub for Sensors {
//!     fn watch_position(&mut self) -> Box<dyn Subscription> { Box::new(Handle) }
//!     fn watch_heading(&mut self) -> Box<dyn Subscription> { Box::new(Handle) }
//! }
//!
//! let mut session = TrackingSession::new();
//! session.start(Permission::Granted, &mut Sensors)?;
//! session.set_target(Some(Coordinate::new(51.5014, -0.1419)));
//!
//! // Forward events from the platform's event loop
//! session.on_fix(RawFix::new(Coordinate::new(51.5007, -0.1246), Some(6.0), 0));
//! let snapshot = session.on_heading(RawHeadingSample::true_north(275.0, 4.0)).unwrap();
//!
//! let alignment = snapshot.alignment.unwrap();
//! assert_eq!(alignment.band, AlignmentBand::Aligned);
//! # Ok::<(), lighthouse_nav::TrackingError>(())
//! ```

pub mod alignment;
mod error;
pub mod geodesic;
pub mod heading;
pub mod location;
pub mod math;
pub mod sensor;
mod session;
mod types;
mod window;

// Re-export all public types and functions
pub use alignment::{Alignment, AlignmentBand, AlignmentClassifier, apply_deadzone, relative_angle};
pub use error::{Result, TrackingError};
pub use geodesic::{EARTH_RADIUS_METERS, bearing, distance};
pub use heading::{HEADING_SAMPLE_SIZE, HeadingSmoother, circular_mean};
pub use location::{GPS_SAMPLE_SIZE, LocationSmoother};
pub use sensor::{SensorHub, SensorSubscriptions, Subscription};
pub use session::{SessionState, SnapshotListener, TrackingSession};
pub use types::*;
pub use window::SampleWindow;
