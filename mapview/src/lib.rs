//! `mapview` is the control core of a map view. It lets an application move the camera, draw
//! markers and polylines and track the device location without knowing which engine actually
//! renders the map.
//!
//! # Main components
//!
//! * [`MapController`] is the single point of mutation for a map. It owns the overlay registry
//!   and the committed camera state, and forwards everything to the bound
//! * [`MapProvider`](provider::MapProvider), the capability a rendering backend implements:
//!   projection, camera application and overlay drawing.
//!   [`HeadlessMapProvider`](provider::HeadlessMapProvider) is an in-memory implementation
//!   useful for tests and servers.
//! * [`CameraUpdate`](camera::CameraUpdate) describes a camera target (fit bounds, move to a
//!   point, rotate, tilt or zoom), and an optional [`Animation`] says how to get there.
//! * [`Marker`](overlay::Marker) and [`Polyline`](overlay::Polyline) are immutable overlays
//!   produced by builders.
//! * [`LocationIndicator`](location::LocationIndicator) consumes location samples, draws the
//!   location marker and optionally keeps the camera centered on the device.
//!
//! ```no_run
//! use mapview::camera::CameraUpdate;
//! use mapview::overlay::{Marker, Polyline};
//! use mapview::provider::HeadlessMapProvider;
//! use mapview::{Animation, Color, MapController, Point, Size};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let route = vec![Point::new(52.516402, 13.379509)?, Point::new(52.535116, 13.389691)?];
//!
//! let mut controller = MapController::new(HeadlessMapProvider::new(Size::new(1080, 1920)));
//! controller.add_polyline(
//!     Polyline::builder(route.clone())
//!         .with_width(6.0)
//!         .with_color(Color::from_argb(0xFF0D53FF))
//!         .build()?,
//! )?;
//! controller.add_marker(Marker::builder(route[0]).build()?)?;
//! let fit = CameraUpdate::bounds(route, 120.0);
//! controller.notify_camera_update(fit, Some(Animation::default()))?;
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod camera;
mod color;
mod controller;
pub mod error;
pub mod location;
mod messenger;
pub mod overlay;
pub mod provider;

pub use animation::{Animation, Easing};
pub use color::Color;
pub use controller::{MapController, MapControllerBuilder, SharedMapController};
pub use error::MapError;
// Reexport the geometry primitives
pub use mapview_types;
pub use mapview_types::{Bounds, GeometryError, Point, ScreenCoordinate, Size};
pub use messenger::{DummyMessenger, Messenger};
