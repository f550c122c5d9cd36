use std::sync::Weak;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use super::{
    CameraMode, IndicatorStatus, LocationError, LocationEvent, LocationSample, LocationSink,
    LocationSource,
};
use crate::camera::CameraUpdate;
use crate::controller::{MapController, SharedMapController};
use crate::overlay::{Marker, MarkerIcon, OverlayHandle};

type StatusListener = Box<dyn Fn(&IndicatorStatus) + Send + Sync>;

/// Shows the device location on the map and optionally keeps the camera on it.
///
/// The indicator is disabled when created. [`enable`](Self::enable) starts the location source,
/// [`disable`](Self::disable) stops it and hides the marker; the application pairs these calls
/// with its own foreground/background lifecycle. Location events arrive asynchronously and are
/// applied on the control thread by [`process_pending`](Self::process_pending) or
/// [`next_event`](Self::next_event).
pub struct LocationIndicator {
    controller: Weak<Mutex<MapController>>,
    source: Box<dyn LocationSource>,
    receiver: Option<mpsc::UnboundedReceiver<LocationEvent>>,
    camera_mode: CameraMode,
    last_known_location: Option<LocationSample>,
    marker: Option<OverlayHandle>,
    status_listener: Option<StatusListener>,
}

impl LocationIndicator {
    /// Creates a disabled indicator drawing on `controller` and fed by `source`.
    ///
    /// The indicator does not keep the controller alive.
    pub fn new(controller: &SharedMapController, source: impl LocationSource + 'static) -> Self {
        Self {
            controller: std::sync::Arc::downgrade(controller),
            source: Box::new(source),
            receiver: None,
            camera_mode: CameraMode::Free,
            last_known_location: None,
            marker: None,
            status_listener: None,
        }
    }

    /// Sets the initial camera mode.
    pub fn with_camera_mode(mut self, mode: CameraMode) -> Self {
        self.camera_mode = mode;
        self
    }

    /// Sets a listener notified of every status change, including source failures.
    pub fn set_status_listener(
        &mut self,
        listener: impl Fn(&IndicatorStatus) + Send + Sync + 'static,
    ) {
        self.status_listener = Some(Box::new(listener));
    }

    /// Returns true between `enable` and `disable`.
    pub fn is_enabled(&self) -> bool {
        self.receiver.is_some()
    }

    /// Current camera mode.
    pub fn camera_mode(&self) -> CameraMode {
        self.camera_mode
    }

    /// Changes the camera mode. The camera is not moved until the next location sample.
    pub fn set_camera_mode(&mut self, mode: CameraMode) {
        log::debug!("Location camera mode set to {mode:?}");
        self.camera_mode = mode;
    }

    /// Last accepted location sample.
    pub fn last_known_location(&self) -> Option<LocationSample> {
        self.last_known_location
    }

    /// Handle of the location marker while it is shown.
    pub fn marker(&self) -> Option<OverlayHandle> {
        self.marker
    }

    /// Starts receiving location updates. Does nothing if already enabled.
    ///
    /// If a location is already known, the marker is shown at it right away.
    pub fn enable(&mut self) -> Result<(), LocationError> {
        if self.is_enabled() {
            return Ok(());
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        self.source.start(LocationSink::new(sender))?;
        self.receiver = Some(receiver);

        if let Some(sample) = self.last_known_location {
            self.show_marker(&sample);
        }

        log::info!("Location indicator enabled");
        self.notify(IndicatorStatus::Enabled);

        Ok(())
    }

    /// Stops receiving location updates and hides the marker. Does nothing if not enabled.
    ///
    /// Events the source sends after this call, or that were queued but not yet processed, are
    /// discarded.
    pub fn disable(&mut self) {
        if self.shut_down() {
            log::info!("Location indicator disabled");
            self.notify(IndicatorStatus::Disabled);
        }
    }

    /// Applies every event received so far without waiting. Returns the number of accepted
    /// location samples.
    pub fn process_pending(&mut self) -> usize {
        let mut accepted = 0;
        while let Some(receiver) = self.receiver.as_mut() {
            let event = match receiver.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    LocationEvent::Failed(LocationError::SourceClosed)
                }
            };

            if self.handle_event(event) {
                accepted += 1;
            }
        }

        accepted
    }

    /// Waits for the next event and applies it.
    ///
    /// Returns false without waiting if the indicator is disabled, and false after applying an
    /// event that disabled it.
    pub async fn next_event(&mut self) -> bool {
        let Some(receiver) = self.receiver.as_mut() else {
            return false;
        };

        let event = receiver
            .recv()
            .await
            .unwrap_or(LocationEvent::Failed(LocationError::SourceClosed));
        self.handle_event(event);

        self.is_enabled()
    }

    fn handle_event(&mut self, event: LocationEvent) -> bool {
        match event {
            LocationEvent::Sample(sample) => {
                self.handle_sample(sample);
                true
            }
            LocationEvent::Failed(error) => {
                log::warn!("Location source failed: {error}");
                if self.shut_down() {
                    self.notify(IndicatorStatus::Failed(error));
                }
                false
            }
        }
    }

    fn handle_sample(&mut self, sample: LocationSample) {
        log::trace!("Location sample {sample:?}");
        self.last_known_location = Some(sample);
        self.show_marker(&sample);

        let CameraMode::Follow { animation } = self.camera_mode else {
            return;
        };

        let Some(controller) = self.controller.upgrade() else {
            return;
        };

        let result = controller
            .lock()
            .notify_camera_update(CameraUpdate::point(sample.point), animation);
        if let Err(error) = result {
            log::warn!("Failed to follow location: {error}");
        }
    }

    fn show_marker(&mut self, sample: &LocationSample) {
        let Some(controller) = self.controller.upgrade() else {
            log::warn!("Map controller is dropped, location marker is not drawn");
            return;
        };
        let mut controller = controller.lock();

        if let Some(handle) = self.marker.take() {
            if let Err(error) = controller.remove_overlay(handle) {
                log::debug!("Previous location marker was not removed: {error}");
            }
        }

        let rotation = sample.bearing.filter(|bearing| bearing.is_finite());
        let marker = Marker::builder(sample.point)
            .with_icon(MarkerIcon::Location)
            .with_rotation(rotation.unwrap_or(0.0))
            .build();

        match marker.and_then(|marker| controller.add_marker(marker)) {
            Ok(handle) => self.marker = Some(handle),
            Err(error) => log::warn!("Failed to draw location marker: {error}"),
        }
    }

    fn hide_marker(&mut self) {
        let Some(handle) = self.marker.take() else {
            return;
        };

        let Some(controller) = self.controller.upgrade() else {
            return;
        };

        let result = controller.lock().remove_overlay(handle);
        if let Err(error) = result {
            log::debug!("Location marker was not removed: {error}");
        }
    }

    /// Stops the source and closes the channel. Returns false if the indicator was not enabled.
    fn shut_down(&mut self) -> bool {
        // Dropping the receiver closes the channel and discards queued events.
        if self.receiver.take().is_none() {
            return false;
        }

        self.source.stop();
        self.hide_marker();
        true
    }

    fn notify(&self, status: IndicatorStatus) {
        if let Some(listener) = &self.status_listener {
            listener(&status);
        }
    }
}

impl Drop for LocationIndicator {
    fn drop(&mut self) {
        self.disable();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mapview_types::{Point, Size};

    use super::*;
    use crate::animation::Animation;
    use crate::location::PushLocationSource;
    use crate::overlay::Overlay;
    use crate::provider::{HeadlessMapProvider, MapProvider};

    fn point(lat: f64, lon: f64) -> Point {
        Point::new(lat, lon).unwrap()
    }

    fn setup(
        mode: CameraMode,
    ) -> (
        LocationIndicator,
        PushLocationSource,
        SharedMapController,
        HeadlessMapProvider,
    ) {
        let provider = HeadlessMapProvider::new(Size::new(1080, 1920));
        let controller = MapController::builder(provider.clone())
            .with_center(point(52.52, 13.40))
            .with_zoom(12.0)
            .build()
            .into_shared();
        let source = PushLocationSource::new();
        let indicator =
            LocationIndicator::new(&controller, source.clone()).with_camera_mode(mode);

        (indicator, source, controller, provider)
    }

    fn record_statuses(indicator: &mut LocationIndicator) -> Arc<Mutex<Vec<IndicatorStatus>>> {
        let statuses = Arc::new(Mutex::new(Vec::new()));
        let sink = statuses.clone();
        indicator.set_status_listener(move |status| sink.lock().push(status.clone()));
        statuses
    }

    #[test]
    fn follow_mode_centers_camera_once_per_sample() {
        let (mut indicator, source, controller, provider) = setup(CameraMode::follow());
        indicator.enable().unwrap();
        let applications = provider.camera_applications();

        let first = point(52.516402, 13.379509);
        let second = point(52.516848, 13.388827);
        assert!(source.push(first));
        assert!(source.push(second));

        assert_eq!(indicator.process_pending(), 2);
        assert_eq!(provider.camera_applications(), applications + 2);
        assert_eq!(controller.lock().camera().center, second);
        assert_eq!(provider.camera().center, second);
        assert_eq!(
            indicator.last_known_location().map(|sample| sample.point),
            Some(second)
        );
    }

    #[test]
    fn follow_mode_survives_detached_map() {
        let (mut indicator, source, controller, provider) = setup(CameraMode::follow());
        indicator.enable().unwrap();
        controller.lock().detach();
        let applications = provider.camera_applications();

        let sample = point(52.516402, 13.379509);
        assert!(source.push(sample));

        assert_eq!(indicator.process_pending(), 1);
        assert_eq!(provider.camera_applications(), applications);
        assert_eq!(
            indicator.last_known_location().map(|sample| sample.point),
            Some(sample)
        );
        assert!(indicator.marker().is_none());
    }

    #[test]
    fn free_mode_does_not_move_camera() {
        let (mut indicator, source, controller, provider) = setup(CameraMode::Free);
        indicator.enable().unwrap();
        let camera = controller.lock().camera();
        let applications = provider.camera_applications();

        source.push(point(52.516402, 13.379509));
        assert_eq!(indicator.process_pending(), 1);

        assert_eq!(provider.camera_applications(), applications);
        assert_eq!(controller.lock().camera(), camera);
        assert!(indicator.marker().is_some());
    }

    #[test]
    fn marker_follows_samples_and_is_rotated_by_bearing() {
        let (mut indicator, source, controller, provider) = setup(CameraMode::Free);
        indicator.enable().unwrap();

        source.push(LocationSample::new(point(52.516402, 13.379509)).with_bearing(-90.0));
        source.push(LocationSample::new(point(52.516848, 13.388827)).with_bearing(f64::NAN));
        indicator.process_pending();

        assert_eq!(controller.lock().overlay_count(), 1);
        let drawn = provider.overlays();
        assert_eq!(drawn.len(), 1);

        let Overlay::Marker(marker) = &drawn[0].1 else {
            panic!("location marker expected, got {:?}", drawn[0].1);
        };
        assert_eq!(marker.point(), point(52.516848, 13.388827));
        assert_eq!(marker.icon(), &MarkerIcon::Location);
        assert_eq!(marker.rotation(), 0.0);
        assert_eq!(Some(drawn[0].0), indicator.marker());
    }

    #[test]
    fn disable_is_idempotent() {
        let (mut indicator, source, controller, _provider) = setup(CameraMode::follow());
        let statuses = record_statuses(&mut indicator);

        indicator.enable().unwrap();
        source.push(point(52.516402, 13.379509));
        indicator.process_pending();

        indicator.disable();
        let camera = controller.lock().camera();
        indicator.disable();

        assert!(!indicator.is_enabled());
        assert!(indicator.marker().is_none());
        assert_eq!(controller.lock().overlay_count(), 0);
        assert_eq!(controller.lock().camera(), camera);
        assert_eq!(
            *statuses.lock(),
            vec![IndicatorStatus::Enabled, IndicatorStatus::Disabled]
        );
    }

    #[test]
    fn samples_after_disable_are_discarded() {
        let (mut indicator, source, _controller, provider) = setup(CameraMode::follow());
        indicator.enable().unwrap();

        source.push(point(52.516402, 13.379509));
        indicator.disable();
        let applications = provider.camera_applications();

        assert!(!source.push(point(52.516848, 13.388827)));
        assert!(!source.is_active());
        assert_eq!(indicator.process_pending(), 0);
        assert_eq!(provider.camera_applications(), applications);
        assert_eq!(indicator.last_known_location(), None);
    }

    #[test]
    fn enabling_twice_keeps_the_session() {
        let (mut indicator, source, _controller, _provider) = setup(CameraMode::Free);
        let statuses = record_statuses(&mut indicator);

        indicator.enable().unwrap();
        indicator.enable().unwrap();
        assert!(source.push(point(52.516402, 13.379509)));
        assert_eq!(indicator.process_pending(), 1);
        assert_eq!(*statuses.lock(), vec![IndicatorStatus::Enabled]);
    }

    #[test]
    fn re_enable_shows_last_known_location() {
        let (mut indicator, source, controller, _provider) = setup(CameraMode::Free);
        indicator.enable().unwrap();
        source.push(point(52.516402, 13.379509));
        indicator.process_pending();
        indicator.disable();
        assert_eq!(controller.lock().overlay_count(), 0);

        indicator.enable().unwrap();
        assert!(indicator.marker().is_some());
        assert_eq!(controller.lock().overlay_count(), 1);
    }

    #[test]
    fn source_failure_disables_indicator() {
        let (mut indicator, source, _controller, _provider) = setup(CameraMode::follow());
        let statuses = record_statuses(&mut indicator);
        indicator.enable().unwrap();

        source.push(point(52.516402, 13.379509));
        source.fail(LocationError::PermissionDenied);
        source.push(point(52.516848, 13.388827));

        assert_eq!(indicator.process_pending(), 1);
        assert!(!indicator.is_enabled());
        assert!(!source.is_active());
        assert_eq!(
            *statuses.lock(),
            vec![
                IndicatorStatus::Enabled,
                IndicatorStatus::Failed(LocationError::PermissionDenied)
            ]
        );
    }

    #[test]
    fn failing_start_keeps_indicator_disabled() {
        struct DeniedSource;

        impl LocationSource for DeniedSource {
            fn start(&mut self, _sink: LocationSink) -> Result<(), LocationError> {
                Err(LocationError::PermissionDenied)
            }

            fn stop(&mut self) {}
        }

        let controller = MapController::new(HeadlessMapProvider::new(Size::new(100, 100)))
            .into_shared();
        let mut indicator = LocationIndicator::new(&controller, DeniedSource);

        assert_eq!(indicator.enable(), Err(LocationError::PermissionDenied));
        assert!(!indicator.is_enabled());
    }

    #[test]
    fn closed_source_disables_indicator() {
        struct OneShotSource;

        impl LocationSource for OneShotSource {
            fn start(&mut self, sink: LocationSink) -> Result<(), LocationError> {
                sink.send_location(Point::new(52.516402, 13.379509).unwrap());
                Ok(())
            }

            fn stop(&mut self) {}
        }

        let controller = MapController::new(HeadlessMapProvider::new(Size::new(100, 100)))
            .into_shared();
        let mut indicator = LocationIndicator::new(&controller, OneShotSource);
        let statuses = record_statuses(&mut indicator);

        indicator.enable().unwrap();
        assert_eq!(indicator.process_pending(), 1);
        assert!(!indicator.is_enabled());
        assert_eq!(
            statuses.lock().last(),
            Some(&IndicatorStatus::Failed(LocationError::SourceClosed))
        );
    }

    #[test]
    fn changing_camera_mode_does_not_move_camera() {
        let (mut indicator, source, controller, provider) = setup(CameraMode::Free);
        indicator.enable().unwrap();
        source.push(point(52.516402, 13.379509));
        indicator.process_pending();

        let camera = controller.lock().camera();
        let applications = provider.camera_applications();
        indicator.set_camera_mode(CameraMode::follow());

        assert!(indicator.camera_mode().is_follow());
        assert_eq!(controller.lock().camera(), camera);
        assert_eq!(provider.camera_applications(), applications);

        source.push(point(52.516848, 13.388827));
        indicator.process_pending();
        assert_eq!(
            controller.lock().camera().center,
            point(52.516848, 13.388827)
        );
    }

    #[test]
    fn dropped_controller_does_not_panic() {
        let (mut indicator, source, controller, _provider) = setup(CameraMode::follow());
        indicator.enable().unwrap();
        drop(controller);

        source.push(point(52.516402, 13.379509));
        assert_eq!(indicator.process_pending(), 1);
        assert!(indicator.marker().is_none());
    }

    #[tokio::test]
    async fn next_event_waits_for_samples_from_another_task() {
        let (mut indicator, source, controller, provider) = setup(CameraMode::follow_animated(
            Animation::builder()
                .with_duration(std::time::Duration::from_millis(50))
                .build(),
        ));
        indicator.enable().unwrap();

        let target = point(52.531264, 13.382194);
        let producer = source.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            producer.push(target)
        });

        assert!(indicator.next_event().await);
        assert!(task.await.unwrap());
        assert_eq!(controller.lock().camera().center, target);
        assert_eq!(provider.animation_target().map(|c| c.center), Some(target));

        indicator.disable();
        assert!(!indicator.next_event().await);
    }
}
