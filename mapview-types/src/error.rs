use thiserror::Error;

/// Error raised when coordinates or point sequences violate geometry invariants.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// Latitude is outside of `[-90, 90]`.
    #[error("latitude {0} is outside of [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude is outside of `[-180, 180]`.
    #[error("longitude {0} is outside of [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// A coordinate or camera parameter is NaN or infinite.
    #[error("value is not a finite number")]
    NotFinite,

    /// Point sequence is empty.
    #[error("point sequence is empty")]
    Empty,

    /// Point sequence is shorter than required.
    #[error("at least {required} points are required, got {actual}")]
    NotEnoughPoints {
        /// Minimum number of points.
        required: usize,
        /// Number of points given.
        actual: usize,
    },
}
