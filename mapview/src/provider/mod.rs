//! Rendering backend capability.
//!
//! A [`MapProvider`] is implemented once per rendering engine. The
//! [`MapController`](crate::MapController) owns exactly one provider and is the only caller of
//! it, so implementations do not need to guard against concurrent calls.

use mapview_types::{Point, ScreenCoordinate, Size};

use crate::animation::Animation;
use crate::camera::{CameraLimits, CameraState};
use crate::overlay::{Overlay, OverlayHandle};

mod headless;

pub use headless::{HeadlessMapProvider, HeadlessProviderBuilder};

/// Capability a rendering backend exposes to the map controller.
pub trait MapProvider: Send {
    /// Current size of the rendering surface in pixels.
    fn viewport_size(&self) -> Size;

    /// Camera ranges the backend supports.
    fn camera_limits(&self) -> CameraLimits {
        CameraLimits::default()
    }

    /// Camera state currently displayed. During an animated transition this is the intermediate
    /// state, not the target.
    fn camera(&self) -> CameraState;

    /// Screen position of a geographic point for the displayed camera.
    fn project(&self, point: Point) -> ScreenCoordinate;

    /// Geographic point at a screen position, or `None` if the position shows no map
    /// (e.g. sky of a tilted camera).
    fn unproject(&self, coordinate: ScreenCoordinate) -> Option<Point>;

    /// Moves the camera to `target`, instantly when `animation` is `None`. A call made while a
    /// previous animated transition is in flight must cancel that transition.
    fn apply_camera_state(&mut self, target: CameraState, animation: Option<Animation>);

    /// Draws the overlay above every overlay drawn before.
    fn draw_overlay(&mut self, handle: OverlayHandle, overlay: &Overlay);

    /// Removes a previously drawn overlay.
    fn remove_overlay(&mut self, handle: OverlayHandle);

    /// Asks the backend to redraw the map.
    fn request_redraw(&self) {}

    /// Releases the rendering surface. No other method is called afterwards.
    fn detach(&mut self) {}
}
