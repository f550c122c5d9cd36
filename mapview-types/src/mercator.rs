//! Spherical Web Mercator math.
//!
//! World coordinates are normalized: `(0, 0)` is the north-west corner of the world square and
//! `(1, 1)` the south-east one. At zoom level `z` the world square is [`world_size`]`(z)` pixels
//! wide.

use std::f64::consts::PI;

use crate::{Point, ScreenCoordinate, Size};

/// Width of the world square in pixels at zoom level 0.
pub const TILE_SIZE: f64 = 512.0;

/// Latitude at which the Web Mercator world square ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Point in normalized Web Mercator world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPoint {
    /// Horizontal position, `0` at longitude -180.
    pub x: f64,
    /// Vertical position, `0` at the northern edge.
    pub y: f64,
}

impl WorldPoint {
    /// Creates a new world point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width of the world square in pixels at the given zoom level.
pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

/// Projects a geographic point into world coordinates. Latitude is clamped to
/// [`MAX_LATITUDE`].
pub fn project(point: Point) -> WorldPoint {
    let lat = point.lat().clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (point.lon() + 180.0) / 360.0;
    let y = (1.0 - (PI / 4.0 + lat / 2.0).tan().ln() / PI) / 2.0;
    WorldPoint::new(x, y)
}

/// Converts world coordinates back into a geographic point.
pub fn unproject(world: WorldPoint) -> Point {
    let x = world.x.clamp(0.0, 1.0);
    let y = world.y.clamp(0.0, 1.0);
    let lon = x * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
    Point::saturating(lat, lon)
}

/// Projects a point onto a viewport showing `center` at the given zoom and bearing.
pub fn to_screen(
    point: Point,
    center: Point,
    zoom: f64,
    bearing: f64,
    viewport: Size,
) -> ScreenCoordinate {
    let scale = world_size(zoom);
    let world = project(point);
    let origin = project(center);
    let (dx, dy) = rotate(
        (world.x - origin.x) * scale,
        (world.y - origin.y) * scale,
        -bearing,
    );
    let screen_center = viewport.center();
    ScreenCoordinate::new(screen_center.x + dx, screen_center.y + dy)
}

/// Inverse of [`to_screen`].
pub fn from_screen(
    coordinate: ScreenCoordinate,
    center: Point,
    zoom: f64,
    bearing: f64,
    viewport: Size,
) -> Point {
    let scale = world_size(zoom);
    let screen_center = viewport.center();
    let (dx, dy) = rotate(
        coordinate.x - screen_center.x,
        coordinate.y - screen_center.y,
        bearing,
    );
    let origin = project(center);
    unproject(WorldPoint::new(origin.x + dx / scale, origin.y + dy / scale))
}

/// Rotates a screen-space vector clockwise by `degrees` (y axis pointing down).
pub fn rotate(x: f64, y: f64, degrees: f64) -> (f64, f64) {
    if degrees == 0.0 {
        return (x, y);
    }

    let (sin, cos) = degrees.to_radians().sin_cos();
    (x * cos - y * sin, x * sin + y * cos)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn world_corners() {
        let origin = project(Point::new(0.0, 0.0).unwrap());
        assert_abs_diff_eq!(origin.x, 0.5);
        assert_abs_diff_eq!(origin.y, 0.5);

        let north_west = project(Point::new(MAX_LATITUDE, -180.0).unwrap());
        assert_abs_diff_eq!(north_west.x, 0.0);
        assert_abs_diff_eq!(north_west.y, 0.0, epsilon = 1e-9);

        // Beyond the mercator limit latitude is clamped.
        let pole = project(Point::new(90.0, 0.0).unwrap());
        assert_abs_diff_eq!(pole.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn world_size_doubles_per_zoom_level() {
        assert_abs_diff_eq!(world_size(0.0), 512.0);
        assert_abs_diff_eq!(world_size(3.0), 4096.0);
        assert_abs_diff_eq!(world_size(1.5) * 2.0, world_size(2.5));
    }

    #[test]
    fn center_projects_to_viewport_center() {
        let center = Point::new(52.52, 13.40).unwrap();
        let size = Size::new(1080, 1920);
        let screen = to_screen(center, center, 14.0, 37.0, size);
        assert_abs_diff_eq!(screen.x, 540.0, epsilon = 1e-9);
        assert_abs_diff_eq!(screen.y, 960.0, epsilon = 1e-9);
    }

    #[test]
    fn bearing_rotates_east_to_top() {
        let center = Point::new(0.0, 0.0).unwrap();
        let east = Point::new(0.0, 1.0).unwrap();
        let size = Size::new(100, 100);

        let screen = to_screen(east, center, 2.0, 90.0, size);
        assert_abs_diff_eq!(screen.x, 50.0, epsilon = 1e-9);
        assert!(screen.y < 50.0);

        let back = from_screen(screen, center, 2.0, 90.0, size);
        assert_abs_diff_eq!(back.lat(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(back.lon(), 1.0, epsilon = 1e-9);
    }
}
