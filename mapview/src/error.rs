//! Error types.

use mapview_types::GeometryError;
use thiserror::Error;

use crate::overlay::OverlayHandle;

/// Error returned by the map controller and overlay builders.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MapError {
    /// Point sequence or coordinate violates geometry requirements.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(#[from] GeometryError),

    /// Overlay styling is malformed.
    #[error("invalid style: {0}")]
    InvalidStyle(String),

    /// No overlay is registered under the handle.
    #[error("overlay {0} is not registered")]
    NotFound(OverlayHandle),

    /// The controller has no attached map provider.
    #[error("map provider is not available")]
    ProviderUnavailable,
}
