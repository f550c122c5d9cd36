//! Device location tracking.
//!
//! A [`LocationSource`] pushes [`LocationEvent`]s from any thread into a [`LocationSink`]. The
//! [`LocationIndicator`] receives them on the control thread, draws the location marker and, in
//! [`CameraMode::Follow`], keeps the camera centered on the device.

use mapview_types::Point;
use thiserror::Error;

use crate::animation::Animation;

mod indicator;
mod source;

pub use indicator::LocationIndicator;
pub use source::{LocationSink, LocationSource, PushLocationSource};

/// Error reported by a location source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// Permission to access the device location was denied or revoked.
    #[error("location permission denied")]
    PermissionDenied,

    /// Location service is not available.
    #[error("location service unavailable: {0}")]
    Unavailable(String),

    /// Source stopped delivering events without reporting an error.
    #[error("location source closed")]
    SourceClosed,
}

/// Single location fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationSample {
    /// Position of the device.
    pub point: Point,
    /// Direction of movement in degrees clockwise from north, if known.
    pub bearing: Option<f64>,
    /// Horizontal accuracy radius in meters, if known.
    pub accuracy: Option<f64>,
}

impl LocationSample {
    /// Creates a sample without bearing or accuracy.
    pub fn new(point: Point) -> Self {
        Self {
            point,
            bearing: None,
            accuracy: None,
        }
    }

    /// Sets the direction of movement.
    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = Some(bearing);
        self
    }

    /// Sets the accuracy radius.
    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy = Some(meters);
        self
    }
}

impl From<Point> for LocationSample {
    fn from(point: Point) -> Self {
        Self::new(point)
    }
}

/// Event delivered by a location source.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    /// New location fix.
    Sample(LocationSample),
    /// Terminal failure. The indicator disables itself on receiving it.
    Failed(LocationError),
}

/// How the location indicator drives the camera.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CameraMode {
    /// Camera is not moved by location updates.
    #[default]
    Free,
    /// Camera is centered on every accepted location sample.
    Follow {
        /// Transition used for every follow update, `None` for instant moves.
        animation: Option<Animation>,
    },
}

impl CameraMode {
    /// Follow mode with instant camera moves.
    pub fn follow() -> Self {
        Self::Follow { animation: None }
    }

    /// Follow mode with animated camera moves.
    pub fn follow_animated(animation: Animation) -> Self {
        Self::Follow {
            animation: Some(animation),
        }
    }

    /// Returns true in follow mode.
    pub fn is_follow(&self) -> bool {
        matches!(self, Self::Follow { .. })
    }
}

/// Status change of a location indicator, reported to the status listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorStatus {
    /// Indicator started receiving location updates.
    Enabled,
    /// Indicator stopped receiving location updates.
    Disabled,
    /// Location source failed; the indicator is disabled.
    Failed(LocationError),
}
