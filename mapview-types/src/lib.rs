//! Geographic primitives shared by the `mapview` crates.
//!
//! * [`Point`] is a validated WGS84 latitude/longitude pair.
//! * [`Bounds`] is the minimal axis-aligned box enclosing a set of points.
//! * [`ScreenCoordinate`] and [`Size`] describe positions and dimensions in viewport pixels.
//! * [`mercator`] contains the Web Mercator math every backend agrees on, so that camera fitting
//!   gives the same answer no matter which engine draws the map.

mod bounds;
mod error;
pub mod mercator;
mod point;
mod screen;

pub use bounds::Bounds;
pub use error::GeometryError;
pub use point::Point;
pub use screen::{ScreenCoordinate, Size};
