/// Messenger is used to notify the host application that the map needs to be redrawn.
///
/// Providers call it whenever their displayed state changes, so a render loop only has to draw
/// frames on request.
pub trait Messenger: Send + Sync {
    /// Requests the host to redraw the map.
    fn request_redraw(&self);
}

/// Messenger that ignores all requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DummyMessenger;

impl Messenger for DummyMessenger {
    fn request_redraw(&self) {}
}

impl<T: Messenger + ?Sized> Messenger for std::sync::Arc<T> {
    fn request_redraw(&self) {
        (**self).request_redraw()
    }
}
