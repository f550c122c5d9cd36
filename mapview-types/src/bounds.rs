use std::borrow::Borrow;

use crate::{GeometryError, Point};

/// Minimal axis-aligned geographic box enclosing a set of points.
///
/// Degenerate bounds (all points equal, or all on one meridian/parallel) are legal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    min: Point,
    max: Point,
}

impl Bounds {
    /// Bounds of a single point.
    pub fn from_point(point: Point) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Computes the bounds of a non-empty sequence of points.
    pub fn from_points<I>(points: I) -> Result<Self, GeometryError>
    where
        I: IntoIterator,
        I::Item: Borrow<Point>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next().ok_or(GeometryError::Empty)?.borrow();

        Ok(iter.fold(Self::from_point(first), |bounds, point| {
            bounds.extended(*point.borrow())
        }))
    }

    /// Returns the bounds grown to include `point`.
    pub fn extended(self, point: Point) -> Self {
        Self {
            min: Point::saturating(
                self.min.lat().min(point.lat()),
                self.min.lon().min(point.lon()),
            ),
            max: Point::saturating(
                self.max.lat().max(point.lat()),
                self.max.lon().max(point.lon()),
            ),
        }
    }

    /// Returns the smallest bounds containing both `self` and `other`.
    pub fn merge(self, other: Bounds) -> Self {
        self.extended(other.min).extended(other.max)
    }

    /// South-west corner.
    pub fn min(&self) -> Point {
        self.min
    }

    /// North-east corner.
    pub fn max(&self) -> Point {
        self.max
    }

    /// Minimum latitude.
    pub fn lat_min(&self) -> f64 {
        self.min.lat()
    }

    /// Maximum latitude.
    pub fn lat_max(&self) -> f64 {
        self.max.lat()
    }

    /// Minimum longitude.
    pub fn lon_min(&self) -> f64 {
        self.min.lon()
    }

    /// Maximum longitude.
    pub fn lon_max(&self) -> f64 {
        self.max.lon()
    }

    /// Arithmetic center of the box in degrees.
    pub fn center(&self) -> Point {
        Point::saturating(
            (self.lat_min() + self.lat_max()) / 2.0,
            (self.lon_min() + self.lon_max()) / 2.0,
        )
    }

    /// Returns true if the point lies inside or on the edge of the bounds.
    pub fn contains(&self, point: Point) -> bool {
        (self.lat_min()..=self.lat_max()).contains(&point.lat())
            && (self.lon_min()..=self.lon_max()).contains(&point.lon())
    }

    /// Four corners, counter-clockwise starting from south-west.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::saturating(self.lat_min(), self.lon_max()),
            self.max,
            Point::saturating(self.lat_max(), self.lon_min()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> Point {
        Point::new(lat, lon).unwrap()
    }

    #[test]
    fn empty_sequence_is_rejected() {
        assert_eq!(
            Bounds::from_points(Vec::<Point>::new()),
            Err(GeometryError::Empty)
        );
    }

    #[test]
    fn single_point_is_degenerate() {
        let p = point(52.5, 13.4);
        let bounds = Bounds::from_points([p]).unwrap();
        assert_eq!(bounds.min(), p);
        assert_eq!(bounds.max(), p);
        assert!(bounds.contains(p));
    }

    #[test]
    fn encloses_every_point_and_is_minimal() {
        let points = [
            point(52.516402, 13.379509),
            point(52.516267, 13.379536),
            point(52.504617, 13.441002),
            point(52.535116, 13.389691),
            point(52.519918, 13.404811),
        ];
        let bounds = Bounds::from_points(&points).unwrap();

        for p in &points {
            assert!(bounds.contains(*p));
        }

        // Every edge of the box is touched by some point.
        assert!(points.iter().any(|p| p.lat() == bounds.lat_min()));
        assert!(points.iter().any(|p| p.lat() == bounds.lat_max()));
        assert!(points.iter().any(|p| p.lon() == bounds.lon_min()));
        assert!(points.iter().any(|p| p.lon() == bounds.lon_max()));

        assert_eq!(bounds.lat_min(), 52.504617);
        assert_eq!(bounds.lat_max(), 52.535116);
        assert_eq!(bounds.lon_min(), 13.379509);
        assert_eq!(bounds.lon_max(), 13.441002);
    }

    #[test]
    fn merge_covers_both() {
        let a = Bounds::from_points([point(0.0, 0.0), point(1.0, 1.0)]).unwrap();
        let b = Bounds::from_points([point(-2.0, 0.5), point(0.5, 3.0)]).unwrap();
        let merged = a.merge(b);

        assert_eq!(merged.min(), point(-2.0, 0.0));
        assert_eq!(merged.max(), point(1.0, 3.0));
        assert_eq!(merged.center(), point(-0.5, 1.5));
    }
}
