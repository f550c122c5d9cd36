use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::{LocationError, LocationEvent, LocationSample};

/// Sending end handed to a [`LocationSource`] when the indicator is enabled.
///
/// A sink belongs to one enable session. Once the indicator is disabled every send returns
/// `false` and the event is dropped.
#[derive(Debug, Clone)]
pub struct LocationSink {
    sender: mpsc::UnboundedSender<LocationEvent>,
}

impl LocationSink {
    pub(super) fn new(sender: mpsc::UnboundedSender<LocationEvent>) -> Self {
        Self { sender }
    }

    /// Delivers a location fix. Returns false if the indicator no longer listens.
    pub fn send_location(&self, sample: impl Into<LocationSample>) -> bool {
        self.send(LocationEvent::Sample(sample.into()))
    }

    /// Reports a terminal failure. Returns false if the indicator no longer listens.
    pub fn send_error(&self, error: LocationError) -> bool {
        self.send(LocationEvent::Failed(error))
    }

    /// Delivers an event. Returns false if the indicator no longer listens.
    pub fn send(&self, event: LocationEvent) -> bool {
        self.sender.send(event).is_ok()
    }

    /// Returns true once the indicator stopped listening.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Completes once the indicator stopped listening.
    pub async fn closed(&self) {
        self.sender.closed().await
    }
}

/// Producer of location events, e.g. a platform location service.
pub trait LocationSource: Send {
    /// Starts delivering events into the sink. Called when the indicator is enabled.
    fn start(&mut self, sink: LocationSink) -> Result<(), LocationError>;

    /// Stops delivering events. Called when the indicator is disabled.
    fn stop(&mut self);
}

/// Location source fed by the host, typically from platform location callbacks.
///
/// Clones share the same sink, so the host keeps one clone and gives the other to the
/// indicator.
#[derive(Debug, Clone, Default)]
pub struct PushLocationSource {
    sink: Arc<Mutex<Option<LocationSink>>>,
}

impl PushLocationSource {
    /// Creates a source that is not started yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a location fix. Returns false if the indicator is not listening.
    pub fn push(&self, sample: impl Into<LocationSample>) -> bool {
        self.sink
            .lock()
            .as_ref()
            .is_some_and(|sink| sink.send_location(sample))
    }

    /// Reports a terminal failure. Returns false if the indicator is not listening.
    pub fn fail(&self, error: LocationError) -> bool {
        self.sink
            .lock()
            .as_ref()
            .is_some_and(|sink| sink.send_error(error))
    }

    /// Returns true while an indicator listens to the source.
    pub fn is_active(&self) -> bool {
        self.sink
            .lock()
            .as_ref()
            .is_some_and(|sink| !sink.is_closed())
    }
}

impl LocationSource for PushLocationSource {
    fn start(&mut self, sink: LocationSink) -> Result<(), LocationError> {
        *self.sink.lock() = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        self.sink.lock().take();
    }
}
