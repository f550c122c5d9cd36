use std::sync::Arc;

use mapview_types::{mercator, Point, ScreenCoordinate, Size};
use parking_lot::RwLock;
use web_time::Instant;

use super::MapProvider;
use crate::animation::Animation;
use crate::camera::{CameraAnimator, CameraLimits, CameraState};
use crate::messenger::Messenger;
use crate::overlay::{Overlay, OverlayHandle};

struct HeadlessState {
    size: Size,
    limits: CameraLimits,
    camera: CameraState,
    animator: CameraAnimator,
    overlays: Vec<(OverlayHandle, Overlay)>,
    camera_applications: u64,
    redraw_count: u64,
    attached: bool,
    messenger: Option<Arc<dyn Messenger>>,
}

/// In-memory map provider that draws nothing.
///
/// It keeps everything a real backend would put on screen: the displayed camera (including
/// in-flight animations), overlays in paint order and redraw requests. Projection is
/// orthographic Web Mercator rotated by the camera bearing; tilt is stored but not applied.
///
/// Clones share the same state, so a clone kept by the host can be used to drive animations
/// from a render loop or to inspect what the controller has drawn.
#[derive(Clone)]
pub struct HeadlessMapProvider {
    state: Arc<RwLock<HeadlessState>>,
}

impl HeadlessMapProvider {
    /// Creates a provider with the given viewport size and default camera limits.
    pub fn new(size: Size) -> Self {
        HeadlessProviderBuilder::new(size).build()
    }

    /// Starts configuring a provider.
    pub fn builder(size: Size) -> HeadlessProviderBuilder {
        HeadlessProviderBuilder::new(size)
    }

    /// Sets the messenger notified on every redraw request.
    pub fn set_messenger(&self, messenger: impl Messenger + 'static) {
        self.state.write().messenger = Some(Arc::new(messenger));
    }

    /// Stops forwarding redraw requests.
    pub fn clear_messenger(&self) {
        self.state.write().messenger = None;
    }

    /// Changes the viewport size, e.g. when the host surface is resized.
    pub fn set_size(&self, size: Size) {
        {
            let mut state = self.state.write();
            if state.size == size {
                return;
            }

            log::debug!("Resizing headless viewport to {}x{}", size.width, size.height);
            state.size = size;
        }

        self.request_redraw();
    }

    /// Advances the in-flight camera transition to the current time.
    ///
    /// Call this once per frame. Returns true if the displayed camera changed.
    pub fn animate(&self) -> bool {
        self.animate_at(Instant::now())
    }

    /// Advances the in-flight camera transition to `now`.
    pub fn animate_at(&self, now: Instant) -> bool {
        let changed = {
            let mut state = self.state.write();
            match state.animator.advance(now) {
                Some(camera) => {
                    state.camera = camera;
                    true
                }
                None => false,
            }
        };

        if changed {
            self.request_redraw();
        }

        changed
    }

    /// Returns true while a camera transition is in flight.
    pub fn is_animating(&self) -> bool {
        self.state.read().animator.is_animating()
    }

    /// Target of the camera transition in flight.
    pub fn animation_target(&self) -> Option<CameraState> {
        self.state.read().animator.target()
    }

    /// Number of overlays currently drawn.
    pub fn overlay_count(&self) -> usize {
        self.state.read().overlays.len()
    }

    /// Drawn overlays in paint order.
    pub fn overlays(&self) -> Vec<(OverlayHandle, Overlay)> {
        self.state.read().overlays.clone()
    }

    /// Number of camera states applied so far.
    pub fn camera_applications(&self) -> u64 {
        self.state.read().camera_applications
    }

    /// Number of redraw requests so far.
    pub fn redraw_count(&self) -> u64 {
        self.state.read().redraw_count
    }

    /// Returns false after the controller detached the provider.
    pub fn is_attached(&self) -> bool {
        self.state.read().attached
    }
}

impl MapProvider for HeadlessMapProvider {
    fn viewport_size(&self) -> Size {
        self.state.read().size
    }

    fn camera_limits(&self) -> CameraLimits {
        self.state.read().limits
    }

    fn camera(&self) -> CameraState {
        self.state.read().camera
    }

    fn project(&self, point: Point) -> ScreenCoordinate {
        let state = self.state.read();
        let camera = state.camera;
        mercator::to_screen(point, camera.center, camera.zoom, camera.bearing, state.size)
    }

    fn unproject(&self, coordinate: ScreenCoordinate) -> Option<Point> {
        let state = self.state.read();
        let camera = state.camera;
        Some(mercator::from_screen(
            coordinate,
            camera.center,
            camera.zoom,
            camera.bearing,
            state.size,
        ))
    }

    fn apply_camera_state(&mut self, target: CameraState, animation: Option<Animation>) {
        let now = Instant::now();
        {
            let mut state = self.state.write();
            state.camera_applications += 1;
            let target = target.normalized(&state.limits);

            match animation {
                None => {
                    state.animator.cancel(now);
                    state.camera = target;
                }
                Some(animation) => {
                    let displayed = state.camera;
                    state.camera = state.animator.start(displayed, target, animation, now);
                }
            }

            log::trace!("Headless camera target {target:?}, animation {animation:?}");
        }

        self.request_redraw();
    }

    fn draw_overlay(&mut self, handle: OverlayHandle, overlay: &Overlay) {
        self.state.write().overlays.push((handle, overlay.clone()));
    }

    fn remove_overlay(&mut self, handle: OverlayHandle) {
        self.state
            .write()
            .overlays
            .retain(|(drawn, _)| *drawn != handle);
    }

    fn request_redraw(&self) {
        let messenger = {
            let mut state = self.state.write();
            state.redraw_count += 1;
            state.messenger.clone()
        };

        // Called without the lock held, the messenger may call back into the provider.
        if let Some(messenger) = messenger {
            messenger.request_redraw();
        }
    }

    fn detach(&mut self) {
        let mut state = self.state.write();
        state.attached = false;
        state.overlays.clear();
        state.animator = CameraAnimator::new();
        state.messenger = None;
        log::debug!("Headless provider detached");
    }
}

/// Builder for [`HeadlessMapProvider`].
pub struct HeadlessProviderBuilder {
    size: Size,
    limits: CameraLimits,
    camera: CameraState,
    messenger: Option<Arc<dyn Messenger>>,
}

impl HeadlessProviderBuilder {
    /// Creates a builder for a viewport of the given size.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            limits: CameraLimits::default(),
            camera: CameraState::default(),
            messenger: None,
        }
    }

    /// Sets the initially displayed camera.
    pub fn with_camera(mut self, camera: CameraState) -> Self {
        self.camera = camera;
        self
    }

    /// Sets the supported camera ranges.
    ///
    /// Non-finite bounds are replaced by the defaults and an inverted range collapses to its
    /// minimum.
    pub fn with_limits(mut self, limits: CameraLimits) -> Self {
        if !limits.is_valid() {
            log::warn!("Invalid camera limits {limits:?}, using {:?}", limits.sanitized());
        }
        self.limits = limits.sanitized();
        self
    }

    /// Sets the messenger notified on redraw requests.
    pub fn with_messenger(mut self, messenger: impl Messenger + 'static) -> Self {
        self.messenger = Some(Arc::new(messenger));
        self
    }

    /// Creates the provider.
    pub fn build(self) -> HeadlessMapProvider {
        HeadlessMapProvider {
            state: Arc::new(RwLock::new(HeadlessState {
                size: self.size,
                limits: self.limits,
                camera: self.camera.normalized(&self.limits),
                animator: CameraAnimator::new(),
                overlays: Vec::new(),
                camera_applications: 0,
                redraw_count: 0,
                attached: true,
                messenger: self.messenger,
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use approx::assert_abs_diff_eq;

    use super::*;

    #[derive(Default)]
    struct CountingMessenger(AtomicUsize);

    impl Messenger for CountingMessenger {
        fn request_redraw(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn berlin() -> Point {
        Point::new(52.52, 13.40).unwrap()
    }

    #[test]
    fn instant_camera_application() {
        let mut provider = HeadlessMapProvider::new(Size::new(800, 600));
        let target = CameraState::new(berlin(), 12.0);
        provider.apply_camera_state(target, None);

        assert_eq!(provider.camera(), target);
        assert!(!provider.is_animating());
        assert_eq!(provider.camera_applications(), 1);

        let screen = provider.project(berlin());
        assert_abs_diff_eq!(screen.x, 400.0, epsilon = 1e-6);
        assert_abs_diff_eq!(screen.y, 300.0, epsilon = 1e-6);

        let back = provider.unproject(ScreenCoordinate::new(400.0, 300.0)).unwrap();
        assert_abs_diff_eq!(back.lat(), 52.52, epsilon = 1e-9);
    }

    #[test]
    fn animated_camera_application() {
        let mut provider = HeadlessMapProvider::new(Size::new(800, 600));
        let start = provider.camera();
        let target = CameraState::new(berlin(), 12.0);
        provider.apply_camera_state(target, Some(Animation::default()));

        assert_eq!(provider.camera(), start);
        assert_eq!(provider.animation_target(), Some(target));

        assert!(provider.animate_at(Instant::now() + Duration::from_secs(1)));
        assert_eq!(provider.camera(), target);
        assert!(!provider.animate_at(Instant::now() + Duration::from_secs(2)));
    }

    #[test]
    fn target_is_clamped_to_limits() {
        let mut provider = HeadlessMapProvider::builder(Size::new(100, 100))
            .with_limits(CameraLimits {
                max_zoom: 18.0,
                ..Default::default()
            })
            .build();
        provider.apply_camera_state(CameraState::new(berlin(), 20.0), None);
        assert_eq!(provider.camera().zoom, 18.0);
    }

    #[test]
    fn invalid_limits_are_sanitized() {
        let mut provider = HeadlessMapProvider::builder(Size::new(100, 100))
            .with_camera(CameraState::new(berlin(), 12.0).with_tilt(20.0))
            .with_limits(CameraLimits {
                min_zoom: 10.0,
                max_zoom: 5.0,
                min_tilt: 0.0,
                max_tilt: f64::NAN,
            })
            .build();

        assert!(provider.camera_limits().is_valid());
        assert_eq!(provider.camera().zoom, 10.0);
        assert_eq!(provider.camera().tilt, 20.0);

        provider.apply_camera_state(CameraState::new(berlin(), 3.0).with_tilt(80.0), None);
        assert_eq!(provider.camera().zoom, 10.0);
        assert_eq!(provider.camera().tilt, 60.0);
    }

    #[test]
    fn overlays_in_paint_order() {
        let mut provider = HeadlessMapProvider::new(Size::new(100, 100));
        let marker: Overlay = crate::overlay::Marker::builder(berlin())
            .build()
            .unwrap()
            .into();

        provider.draw_overlay(OverlayHandle::new(1), &marker);
        provider.draw_overlay(OverlayHandle::new(2), &marker);
        provider.draw_overlay(OverlayHandle::new(3), &marker);
        provider.remove_overlay(OverlayHandle::new(2));

        let handles: Vec<_> = provider.overlays().into_iter().map(|(h, _)| h).collect();
        assert_eq!(handles, vec![OverlayHandle::new(1), OverlayHandle::new(3)]);
    }

    #[test]
    fn messenger_receives_redraw_requests() {
        let messenger = Arc::new(CountingMessenger::default());
        let mut provider = HeadlessMapProvider::builder(Size::new(100, 100))
            .with_messenger(messenger.clone())
            .build();

        provider.apply_camera_state(CameraState::new(berlin(), 3.0), None);
        provider.set_size(Size::new(200, 100));
        provider.set_size(Size::new(200, 100));

        assert_eq!(messenger.0.load(Ordering::SeqCst), 2);
        assert_eq!(provider.redraw_count(), 2);
    }

    #[test]
    fn clones_share_state() {
        let mut provider = HeadlessMapProvider::new(Size::new(100, 100));
        let observer = provider.clone();
        provider.detach();
        assert!(!observer.is_attached());
    }
}
