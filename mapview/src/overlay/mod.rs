//! Overlays are vector shapes drawn above the base map.
//!
//! Overlays are created with builders and are immutable afterwards. Once an overlay is added to a
//! [`MapController`](crate::MapController), it is identified by the [`OverlayHandle`] returned
//! from the add call.

use std::fmt::{Display, Formatter};

use mapview_types::{Bounds, Point};

mod marker;
mod polyline;

pub use marker::{Marker, MarkerBuilder, MarkerIcon};
pub use polyline::{
    Polyline, PolylineBorder, PolylineBuilder, PolylineColors, DEFAULT_POLYLINE_WIDTH,
    MIN_POLYLINE_POINTS,
};

/// Opaque identifier of an overlay registered in a map controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayHandle(u64);

impl OverlayHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

impl Display for OverlayHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A renderable overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Single point marker.
    Marker(Marker),
    /// Line through a sequence of points.
    Polyline(Polyline),
}

impl Overlay {
    /// Geographic extent of the overlay.
    pub fn bounds(&self) -> Bounds {
        match self {
            Overlay::Marker(marker) => Bounds::from_point(marker.point()),
            Overlay::Polyline(polyline) => polyline.bounds(),
        }
    }

    /// All points of the overlay.
    pub fn points(&self) -> &[Point] {
        match self {
            Overlay::Marker(marker) => std::slice::from_ref(marker.point_ref()),
            Overlay::Polyline(polyline) => polyline.points(),
        }
    }

    /// Returns the marker if the overlay is one.
    pub fn as_marker(&self) -> Option<&Marker> {
        match self {
            Overlay::Marker(marker) => Some(marker),
            Overlay::Polyline(_) => None,
        }
    }

    /// Returns the polyline if the overlay is one.
    pub fn as_polyline(&self) -> Option<&Polyline> {
        match self {
            Overlay::Polyline(polyline) => Some(polyline),
            Overlay::Marker(_) => None,
        }
    }
}

impl From<Marker> for Overlay {
    fn from(marker: Marker) -> Self {
        Overlay::Marker(marker)
    }
}

impl From<Polyline> for Overlay {
    fn from(polyline: Polyline) -> Self {
        Overlay::Polyline(polyline)
    }
}
