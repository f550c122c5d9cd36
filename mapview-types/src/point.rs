use crate::GeometryError;

/// Geographic point in WGS84 degrees.
///
/// A `Point` can only be created through [`Point::new`] (or [`Point::saturating`]), so the
/// latitude is always within `[-90, 90]` and the longitude within `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawPoint", into = "RawPoint")
)]
pub struct Point {
    lat: f64,
    lon: f64,
}

impl Point {
    /// Creates a new point, validating the coordinate ranges.
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeometryError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(GeometryError::NotFinite);
        }

        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeometryError::LatitudeOutOfRange(lat));
        }

        if !(-180.0..=180.0).contains(&lon) {
            return Err(GeometryError::LongitudeOutOfRange(lon));
        }

        Ok(Self { lat, lon })
    }

    /// Creates a point clamping both coordinates into their valid ranges.
    ///
    /// Non-finite values collapse to `0.0`.
    pub fn saturating(lat: f64, lon: f64) -> Self {
        let lat = if lat.is_finite() { lat.clamp(-90.0, 90.0) } else { 0.0 };
        let lon = if lon.is_finite() { lon.clamp(-180.0, 180.0) } else { 0.0 };
        Self { lat, lon }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawPoint {
    lat: f64,
    lon: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPoint> for Point {
    type Error = GeometryError;

    fn try_from(raw: RawPoint) -> Result<Self, Self::Error> {
        Point::new(raw.lat, raw.lon)
    }
}

#[cfg(feature = "serde")]
impl From<Point> for RawPoint {
    fn from(point: Point) -> Self {
        Self {
            lat: point.lat,
            lon: point.lon,
        }
    }
}
