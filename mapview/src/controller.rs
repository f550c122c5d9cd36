use std::sync::Arc;

use mapview_types::{Point, ScreenCoordinate, Size};
use parking_lot::Mutex;

use crate::animation::Animation;
use crate::camera::{CameraState, CameraUpdate};
use crate::error::MapError;
use crate::overlay::{Marker, Overlay, OverlayHandle, Polyline};
use crate::provider::MapProvider;

/// Map controller shared between the application and a
/// [`LocationIndicator`](crate::location::LocationIndicator).
pub type SharedMapController = Arc<Mutex<MapController>>;

/// Single point of mutation for the overlays and the camera of one map.
///
/// The controller owns the overlay registry and the committed camera state and forwards every
/// change to the bound [`MapProvider`]. All calls are expected to come from one control thread;
/// the controller itself does no locking.
pub struct MapController {
    provider: Option<Box<dyn MapProvider>>,
    overlays: Vec<(OverlayHandle, Overlay)>,
    camera: CameraState,
    next_handle: u64,
}

impl MapController {
    /// Creates a controller bound to the provider, taking the camera the provider displays.
    pub fn new(provider: impl MapProvider + 'static) -> Self {
        MapControllerBuilder::new(provider).build()
    }

    /// Starts configuring a controller bound to the provider.
    pub fn builder(provider: impl MapProvider + 'static) -> MapControllerBuilder {
        MapControllerBuilder::new(provider)
    }

    /// Wraps the controller for sharing with a location indicator.
    pub fn into_shared(self) -> SharedMapController {
        Arc::new(Mutex::new(self))
    }

    /// Registers a marker and draws it above all existing overlays.
    pub fn add_marker(&mut self, marker: Marker) -> Result<OverlayHandle, MapError> {
        self.add_overlay(Overlay::Marker(marker))
    }

    /// Registers a polyline and draws it above all existing overlays.
    pub fn add_polyline(&mut self, polyline: Polyline) -> Result<OverlayHandle, MapError> {
        self.add_overlay(Overlay::Polyline(polyline))
    }

    /// Registers an overlay and draws it above all existing overlays.
    pub fn add_overlay(&mut self, overlay: Overlay) -> Result<OverlayHandle, MapError> {
        let provider = self
            .provider
            .as_mut()
            .ok_or(MapError::ProviderUnavailable)?;

        self.next_handle += 1;
        let handle = OverlayHandle::new(self.next_handle);

        provider.draw_overlay(handle, &overlay);
        provider.request_redraw();
        self.overlays.push((handle, overlay));

        log::debug!(
            "Added overlay {handle}, {} overlays registered",
            self.overlays.len()
        );

        Ok(handle)
    }

    /// Removes the overlay. Unknown handles leave the registry untouched and return
    /// [`MapError::NotFound`].
    pub fn remove_overlay(&mut self, handle: OverlayHandle) -> Result<(), MapError> {
        let provider = self
            .provider
            .as_mut()
            .ok_or(MapError::ProviderUnavailable)?;

        let index = self
            .overlays
            .iter()
            .position(|(registered, _)| *registered == handle)
            .ok_or(MapError::NotFound(handle))?;

        self.overlays.remove(index);
        provider.remove_overlay(handle);
        provider.request_redraw();

        log::debug!(
            "Removed overlay {handle}, {} overlays registered",
            self.overlays.len()
        );

        Ok(())
    }

    /// Removes every overlay, topmost first.
    pub fn clear_overlays(&mut self) -> Result<(), MapError> {
        let provider = self
            .provider
            .as_mut()
            .ok_or(MapError::ProviderUnavailable)?;

        if self.overlays.is_empty() {
            return Ok(());
        }

        for (handle, _) in self.overlays.drain(..).rev() {
            provider.remove_overlay(handle);
        }
        provider.request_redraw();

        Ok(())
    }

    /// Overlay registered under the handle.
    pub fn overlay(&self, handle: OverlayHandle) -> Option<&Overlay> {
        self.overlays
            .iter()
            .find(|(registered, _)| *registered == handle)
            .map(|(_, overlay)| overlay)
    }

    /// Registered overlays in paint order (bottom first).
    pub fn overlays(&self) -> impl Iterator<Item = (OverlayHandle, &Overlay)> + '_ {
        self.overlays
            .iter()
            .map(|(handle, overlay)| (*handle, overlay))
    }

    /// Number of registered overlays.
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Computes the camera target for the update, commits it and hands it to the provider.
    ///
    /// Returns as soon as the provider accepted the target. With an animation the provider
    /// interpolates towards the target over time; any transition still in flight is cancelled
    /// and replaced.
    pub fn notify_camera_update(
        &mut self,
        update: CameraUpdate,
        animation: Option<Animation>,
    ) -> Result<(), MapError> {
        let provider = self
            .provider
            .as_mut()
            .ok_or(MapError::ProviderUnavailable)?;

        let target = update.resolve(
            &self.camera,
            &provider.camera_limits(),
            provider.viewport_size(),
        )?;

        log::debug!("Camera update {update:?} resolved to {target:?}");

        self.camera = target;
        provider.apply_camera_state(target, animation);

        Ok(())
    }

    /// Committed camera state: the target of the last camera update.
    pub fn camera(&self) -> CameraState {
        self.camera
    }

    /// Size of the provider's viewport.
    pub fn viewport_size(&self) -> Result<Size, MapError> {
        Ok(self.provider()?.viewport_size())
    }

    /// Screen position of the point for the camera the provider currently displays.
    pub fn project(&self, point: Point) -> Result<ScreenCoordinate, MapError> {
        Ok(self.provider()?.project(point))
    }

    /// Geographic point at the screen position for the camera the provider currently displays.
    pub fn unproject(&self, coordinate: ScreenCoordinate) -> Result<Option<Point>, MapError> {
        Ok(self.provider()?.unproject(coordinate))
    }

    /// Returns false once the provider was detached.
    pub fn is_attached(&self) -> bool {
        self.provider.is_some()
    }

    /// Detaches and drops the provider. Afterwards every call that needs the provider fails
    /// with [`MapError::ProviderUnavailable`]. The overlay registry is cleared.
    pub fn detach(&mut self) {
        if let Some(mut provider) = self.provider.take() {
            provider.detach();
            self.overlays.clear();
            log::info!("Map provider detached");
        }
    }

    fn provider(&self) -> Result<&dyn MapProvider, MapError> {
        self.provider
            .as_deref()
            .ok_or(MapError::ProviderUnavailable)
    }
}

impl Drop for MapController {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Builder for [`MapController`].
pub struct MapControllerBuilder {
    provider: Box<dyn MapProvider>,
    center: Option<Point>,
    zoom: Option<f64>,
}

impl MapControllerBuilder {
    /// Creates a builder bound to the provider.
    pub fn new(provider: impl MapProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            center: None,
            zoom: None,
        }
    }

    /// Sets the initial camera center.
    pub fn with_center(mut self, center: Point) -> Self {
        self.center = Some(center);
        self
    }

    /// Sets the initial zoom level.
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// Creates the controller. If an initial center or zoom was given, it is applied to the
    /// provider instantly.
    pub fn build(self) -> MapController {
        let mut provider = self.provider;
        let mut camera = provider.camera();

        if self.center.is_some() || self.zoom.is_some() {
            if let Some(center) = self.center {
                camera.center = center;
            }
            if let Some(zoom) = self.zoom.filter(|zoom| zoom.is_finite()) {
                camera.zoom = zoom;
            }

            camera = camera.normalized(&provider.camera_limits());
            provider.apply_camera_state(camera, None);
        }

        MapController {
            provider: Some(provider),
            overlays: Vec::new(),
            camera,
            next_handle: 0,
        }
    }
}
