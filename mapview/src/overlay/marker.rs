use mapview_types::Point;

use crate::error::MapError;

/// Icon a marker is drawn with. The actual image is chosen by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum MarkerIcon {
    /// Provider's default pin.
    #[default]
    Default,
    /// Device location indicator.
    Location,
    /// Icon registered in the provider under the given name.
    Named(String),
}

/// Marker at a single geographic point.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    point: Point,
    icon: MarkerIcon,
    rotation: f64,
    id: Option<String>,
}

impl Marker {
    /// Starts building a marker at the given point.
    pub fn builder(point: Point) -> MarkerBuilder {
        MarkerBuilder {
            point,
            icon: MarkerIcon::Default,
            rotation: 0.0,
            id: None,
        }
    }

    /// Position of the marker.
    pub fn point(&self) -> Point {
        self.point
    }

    pub(super) fn point_ref(&self) -> &Point {
        &self.point
    }

    /// Icon of the marker.
    pub fn icon(&self) -> &MarkerIcon {
        &self.icon
    }

    /// Clockwise rotation of the icon in degrees, in `[0, 360)`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Application defined identity of the marker.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Builder for [`Marker`].
#[derive(Debug, Clone)]
pub struct MarkerBuilder {
    point: Point,
    icon: MarkerIcon,
    rotation: f64,
    id: Option<String>,
}

impl MarkerBuilder {
    /// Sets the icon.
    pub fn with_icon(mut self, icon: MarkerIcon) -> Self {
        self.icon = icon;
        self
    }

    /// Sets the clockwise icon rotation in degrees.
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Sets the application defined identity.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Validates the configuration and creates the marker.
    pub fn build(self) -> Result<Marker, MapError> {
        if !self.rotation.is_finite() {
            return Err(MapError::InvalidStyle(format!(
                "marker rotation must be finite, got {}",
                self.rotation
            )));
        }

        if let MarkerIcon::Named(name) = &self.icon {
            if name.is_empty() {
                return Err(MapError::InvalidStyle("marker icon name is empty".into()));
            }
        }

        Ok(Marker {
            point: self.point,
            icon: self.icon,
            rotation: crate::camera::normalize_bearing(self.rotation),
            id: self.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let point = Point::new(52.516402, 13.379509).unwrap();
        let marker = Marker::builder(point).build().unwrap();
        assert_eq!(marker.point(), point);
        assert_eq!(marker.icon(), &MarkerIcon::Default);
        assert_eq!(marker.rotation(), 0.0);
        assert_eq!(marker.id(), None);
    }

    #[test]
    fn rotation_is_normalized() {
        let point = Point::new(0.0, 0.0).unwrap();
        let marker = Marker::builder(point)
            .with_rotation(-90.0)
            .with_id("start")
            .build()
            .unwrap();
        assert_eq!(marker.rotation(), 270.0);
        assert_eq!(marker.id(), Some("start"));
    }

    #[test]
    fn invalid_style() {
        let point = Point::new(0.0, 0.0).unwrap();
        assert!(matches!(
            Marker::builder(point).with_rotation(f64::NAN).build(),
            Err(MapError::InvalidStyle(_))
        ));
        assert!(matches!(
            Marker::builder(point)
                .with_icon(MarkerIcon::Named(String::new()))
                .build(),
            Err(MapError::InvalidStyle(_))
        ));
    }
}
