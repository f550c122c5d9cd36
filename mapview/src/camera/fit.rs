//! Bounds fitting: the largest zoom at which a set of points fits into the padded viewport.

use mapview_types::mercator::{self, WorldPoint, TILE_SIZE};
use mapview_types::{Bounds, Point, Size};

use super::CameraLimits;
use crate::error::MapError;

const SEARCH_ITERATIONS: usize = 64;

/// Returns the center and zoom level at which the bounds of `points`, inflated by `padding`
/// pixels on every side, fit the viewport rotated by `bearing`.
pub(super) fn fit_bounds(
    points: &[Point],
    padding: f64,
    bearing: f64,
    limits: &CameraLimits,
    viewport: Size,
) -> Result<(Point, f64), MapError> {
    let bounds = Bounds::from_points(points)?;
    let limits = limits.sanitized();

    let south_west = mercator::project(bounds.min());
    let north_east = mercator::project(bounds.max());
    let center = WorldPoint::new(
        (south_west.x + north_east.x) / 2.0,
        (south_west.y + north_east.y) / 2.0,
    );

    // Half extents of the box in screen orientation at zoom 0.
    let mut half_width = 0.0_f64;
    let mut half_height = 0.0_f64;
    for corner in bounds.corners() {
        let world = mercator::project(corner);
        let (x, y) = mercator::rotate(
            (world.x - center.x) * TILE_SIZE,
            (world.y - center.y) * TILE_SIZE,
            -bearing,
        );
        half_width = half_width.max(x.abs());
        half_height = half_height.max(y.abs());
    }

    let center = mercator::unproject(center);
    let available_width = viewport.width as f64 / 2.0 - padding;
    let available_height = viewport.height as f64 / 2.0 - padding;

    if available_width <= 0.0 || available_height <= 0.0 {
        log::warn!(
            "Padding of {padding}px leaves no space in {}x{} viewport, using minimum zoom",
            viewport.width,
            viewport.height
        );
        return Ok((center, limits.min_zoom));
    }

    // Visible span shrinks as zoom grows, so the predicate is monotonic.
    let fits = |zoom: f64| {
        let scale = zoom.exp2();
        half_width * scale <= available_width && half_height * scale <= available_height
    };

    if fits(limits.max_zoom) {
        return Ok((center, limits.max_zoom));
    }

    if !fits(limits.min_zoom) {
        log::warn!("Bounds {bounds:?} do not fit the viewport even at minimum zoom");
        return Ok((center, limits.min_zoom));
    }

    let (mut low, mut high) = (limits.min_zoom, limits.max_zoom);
    for _ in 0..SEARCH_ITERATIONS {
        let mid = (low + high) / 2.0;
        if fits(mid) {
            low = mid;
        } else {
            high = mid;
        }
    }

    log::trace!("Fitted {} points at zoom {low} around {center:?}", points.len());

    Ok((center, low))
}
