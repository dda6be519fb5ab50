//! Error type for the navigation core

use crate::session::SessionState;

/// Errors surfaced by a [`TrackingSession`](crate::TrackingSession)
///
/// Geodesic math, smoothing and classification are total and never fail;
/// only session lifecycle and configuration produce errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackingError {
    /// Location permission was refused; the session is terminal
    #[error("location permission denied")]
    PermissionDenied,

    /// Lifecycle operation not allowed from the current state
    #[error("cannot {action} a session that is {from:?}")]
    InvalidTransition {
        from: SessionState,
        action: &'static str,
    },

    #[error("invalid tracking settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = core::result::Result<T, TrackingError>;
