//! Camera model: the state a camera can be in and the updates that move it.

use mapview_types::{mercator, Point};

mod animator;
mod fit;
mod update;

pub use animator::CameraAnimator;
pub use update::CameraUpdate;

/// Position of the virtual viewpoint over the map.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraState {
    /// Geographic point shown in the center of the viewport.
    pub center: Point,
    /// Zoom level. At level `z` the world is `512 * 2^z` pixels wide.
    pub zoom: f64,
    /// Clockwise rotation of the map in degrees, in `[0, 360)`.
    pub bearing: f64,
    /// Pitch of the camera in degrees, `0` looks straight down.
    pub tilt: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            center: Point::saturating(0.0, 0.0),
            zoom: 0.0,
            bearing: 0.0,
            tilt: 0.0,
        }
    }
}

impl CameraState {
    /// Camera looking straight down at `center` with north up.
    pub fn new(center: Point, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            ..Default::default()
        }
    }

    /// Returns the state with a different bearing.
    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = normalize_bearing(bearing);
        self
    }

    /// Returns the state with a different tilt.
    pub fn with_tilt(mut self, tilt: f64) -> Self {
        self.tilt = tilt;
        self
    }

    /// Returns the state with every axis brought into the valid ranges.
    pub fn normalized(self, limits: &CameraLimits) -> Self {
        Self {
            center: self.center,
            zoom: limits.clamp_zoom(self.zoom),
            bearing: normalize_bearing(self.bearing),
            tilt: limits.clamp_tilt(self.tilt),
        }
    }

    /// State between `self` (`t = 0`) and `target` (`t = 1`).
    ///
    /// The center moves linearly in Web Mercator space and the bearing turns along the shorter
    /// arc.
    pub fn interpolate(&self, target: &CameraState, t: f64) -> CameraState {
        let from = mercator::project(self.center);
        let to = mercator::project(target.center);
        let center = mercator::unproject(mercator::WorldPoint::new(
            from.x + (to.x - from.x) * t,
            from.y + (to.y - from.y) * t,
        ));

        let bearing_delta = (target.bearing - self.bearing + 180.0).rem_euclid(360.0) - 180.0;

        CameraState {
            center,
            zoom: self.zoom + (target.zoom - self.zoom) * t,
            bearing: normalize_bearing(self.bearing + bearing_delta * t),
            tilt: self.tilt + (target.tilt - self.tilt) * t,
        }
    }
}

/// Camera ranges supported by a provider.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraLimits {
    /// Minimum zoom level.
    pub min_zoom: f64,
    /// Maximum zoom level.
    pub max_zoom: f64,
    /// Minimum tilt in degrees.
    pub min_tilt: f64,
    /// Maximum tilt in degrees.
    pub max_tilt: f64,
}

impl Default for CameraLimits {
    fn default() -> Self {
        Self {
            min_zoom: 0.0,
            max_zoom: 22.0,
            min_tilt: 0.0,
            max_tilt: 60.0,
        }
    }
}

impl CameraLimits {
    /// Returns true if every bound is finite and neither range is inverted.
    pub fn is_valid(&self) -> bool {
        [self.min_zoom, self.max_zoom, self.min_tilt, self.max_tilt]
            .iter()
            .all(|bound| bound.is_finite())
            && self.min_zoom <= self.max_zoom
            && self.min_tilt <= self.max_tilt
    }

    /// Returns usable limits: non-finite bounds are replaced by the defaults, and an inverted
    /// range collapses to its minimum.
    pub fn sanitized(&self) -> Self {
        let default = Self::default();
        let (min_zoom, max_zoom) =
            sanitize_range(self.min_zoom, self.max_zoom, default.min_zoom, default.max_zoom);
        let (min_tilt, max_tilt) =
            sanitize_range(self.min_tilt, self.max_tilt, default.min_tilt, default.max_tilt);

        Self {
            min_zoom,
            max_zoom,
            min_tilt,
            max_tilt,
        }
    }

    /// Clamps the zoom level into `[min_zoom, max_zoom]`.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        let limits = self.sanitized();
        zoom.clamp(limits.min_zoom, limits.max_zoom)
    }

    /// Clamps the tilt into `[min_tilt, max_tilt]`.
    pub fn clamp_tilt(&self, tilt: f64) -> f64 {
        let limits = self.sanitized();
        tilt.clamp(limits.min_tilt, limits.max_tilt)
    }
}

fn sanitize_range(min: f64, max: f64, default_min: f64, default_max: f64) -> (f64, f64) {
    let min = if min.is_finite() { min } else { default_min };
    let max = if max.is_finite() { max } else { default_max };
    if min <= max {
        (min, max)
    } else {
        (min, min)
    }
}

/// Brings an angle in degrees into `[0, 360)`.
pub fn normalize_bearing(degrees: f64) -> f64 {
    let bearing = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative values up to exactly 360.0
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}
