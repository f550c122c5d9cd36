use mapview_types::{GeometryError, Point, Size};

use super::{fit, normalize_bearing, CameraLimits, CameraState};
use crate::error::MapError;

/// Desired camera target.
///
/// An update carries only the parameters needed to compute the target camera state; how the
/// camera gets there is given separately as an optional [`Animation`](crate::Animation).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CameraUpdate {
    /// Fit all the points into the viewport, leaving `padding` pixels free on every side.
    Bounds {
        /// Points that must be visible.
        points: Vec<Point>,
        /// Free space in pixels on every side of the viewport.
        padding: f64,
    },
    /// Center the camera on the point, keeping zoom, bearing and tilt.
    Point(Point),
    /// Rotate the map to the bearing in degrees.
    Bearing(f64),
    /// Tilt the camera to the angle in degrees.
    Tilt(f64),
    /// Change the zoom level.
    Zoom(f64),
}

impl CameraUpdate {
    /// Update showing all `points` with `padding` pixels around them.
    pub fn bounds(points: impl IntoIterator<Item = Point>, padding: f64) -> Self {
        Self::Bounds {
            points: points.into_iter().collect(),
            padding,
        }
    }

    /// Update centering the camera on `target`.
    pub fn point(target: Point) -> Self {
        Self::Point(target)
    }

    /// Update rotating the map.
    pub fn bearing(degrees: f64) -> Self {
        Self::Bearing(degrees)
    }

    /// Update tilting the camera.
    pub fn tilt(degrees: f64) -> Self {
        Self::Tilt(degrees)
    }

    /// Update changing the zoom level.
    pub fn zoom(level: f64) -> Self {
        Self::Zoom(level)
    }

    /// Computes the camera state this update leads to from `current`.
    ///
    /// Bearing is wrapped into `[0, 360)`, tilt and zoom are clamped into `limits`. Negative
    /// padding is treated as zero.
    pub fn resolve(
        &self,
        current: &CameraState,
        limits: &CameraLimits,
        viewport: Size,
    ) -> Result<CameraState, MapError> {
        let target = match self {
            CameraUpdate::Bounds { points, padding } => {
                let padding = finite(*padding)?.max(0.0);
                let (center, zoom) =
                    fit::fit_bounds(points, padding, current.bearing, limits, viewport)?;
                CameraState {
                    center,
                    zoom,
                    ..*current
                }
            }
            CameraUpdate::Point(target) => CameraState {
                center: *target,
                ..*current
            },
            CameraUpdate::Bearing(degrees) => CameraState {
                bearing: normalize_bearing(finite(*degrees)?),
                ..*current
            },
            CameraUpdate::Tilt(degrees) => CameraState {
                tilt: limits.clamp_tilt(finite(*degrees)?),
                ..*current
            },
            CameraUpdate::Zoom(level) => CameraState {
                zoom: limits.clamp_zoom(finite(*level)?),
                ..*current
            },
        };

        Ok(target)
    }
}

fn finite(value: f64) -> Result<f64, MapError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::NotFinite.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> CameraState {
        CameraState::new(Point::new(52.52, 13.40).unwrap(), 10.0)
            .with_bearing(15.0)
            .with_tilt(20.0)
    }

    fn resolve(update: CameraUpdate) -> Result<CameraState, MapError> {
        update.resolve(&current(), &CameraLimits::default(), Size::new(1080, 1920))
    }

    #[test]
    fn point_keeps_other_axes() {
        let target = Point::new(52.504617, 13.441002).unwrap();
        let state = resolve(CameraUpdate::point(target)).unwrap();
        assert_eq!(state.center, target);
        assert_eq!(state.zoom, 10.0);
        assert_eq!(state.bearing, 15.0);
        assert_eq!(state.tilt, 20.0);
    }

    #[test]
    fn bearing_wraps_around() {
        let a = resolve(CameraUpdate::bearing(40.0)).unwrap();
        let b = resolve(CameraUpdate::bearing(400.0)).unwrap();
        assert_eq!(a.bearing, b.bearing);
        assert_eq!(a.center, current().center);
    }

    #[test]
    fn tilt_and_zoom_are_clamped() {
        assert_eq!(resolve(CameraUpdate::tilt(80.0)).unwrap().tilt, 60.0);
        assert_eq!(resolve(CameraUpdate::tilt(-5.0)).unwrap().tilt, 0.0);
        assert_eq!(resolve(CameraUpdate::zoom(25.0)).unwrap().zoom, 22.0);
        assert_eq!(resolve(CameraUpdate::zoom(3.5)).unwrap().zoom, 3.5);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert_eq!(
            resolve(CameraUpdate::zoom(f64::NAN)),
            Err(MapError::InvalidGeometry(GeometryError::NotFinite))
        );
        assert!(resolve(CameraUpdate::bearing(f64::INFINITY)).is_err());
        assert!(resolve(CameraUpdate::bounds([current().center], f64::NAN)).is_err());
    }

    #[test]
    fn empty_bounds_are_rejected() {
        assert_eq!(
            resolve(CameraUpdate::bounds(Vec::new(), 10.0)),
            Err(MapError::InvalidGeometry(GeometryError::Empty))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_from_json() {
        let updates: Vec<CameraUpdate> = serde_json::from_str(
            r#"[
                { "Zoom": 16 },
                { "Bearing": 90.5 },
                { "Point": { "lat": 52.516402, "lon": 13.379509 } },
                { "Bounds": { "points": [{ "lat": 52.5, "lon": 13.3 }], "padding": 120 } }
            ]"#,
        )
        .unwrap();

        assert_eq!(updates[0], CameraUpdate::zoom(16.0));
        assert_eq!(updates[1], CameraUpdate::bearing(90.5));
        assert_eq!(
            updates[2],
            CameraUpdate::point(Point::new(52.516402, 13.379509).unwrap())
        );
        assert_eq!(
            updates[3],
            CameraUpdate::bounds([Point::new(52.5, 13.3).unwrap()], 120.0)
        );
    }
}
