//! Demo configuration loaded from JSON.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use mapview::camera::CameraUpdate;
use mapview::overlay::{Polyline, PolylineBuilder};
use mapview::{Animation, Color, Point, Size};
use serde::Deserialize;

const DEFAULT_CONFIG: &str = include_str!("../data/berlin.json");

/// Everything the demo draws and plays back.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    /// Viewport of the headless map.
    pub viewport: Size,
    /// Target frame rate of the render loop.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Initial camera center.
    pub center: Point,
    /// Initial zoom level.
    pub zoom: f64,
    /// Padding in pixels used to fit the camera to the routes.
    #[serde(default)]
    pub padding: f64,
    /// Duration of camera transitions in milliseconds, 0 for instant moves.
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,
    /// Routes drawn as polylines with markers at both ends.
    pub routes: Vec<RouteConfig>,
    /// Camera updates played after fitting the routes.
    #[serde(default)]
    pub tour: Vec<CameraUpdate>,
    /// Simulated device movement.
    pub track: TrackConfig,
}

/// Route drawn as a polyline.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    /// Route vertices.
    pub points: Vec<Point>,
    /// Line width in pixels.
    pub width: Option<f32>,
    /// Uniform line color.
    pub color: Option<Color>,
    /// Per-vertex colors, cycled over the vertices.
    #[serde(default)]
    pub colors: Vec<Color>,
    /// Border width in pixels.
    pub border_width: Option<f32>,
    /// Border color.
    pub border_color: Option<Color>,
}

/// Simulated device track.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackConfig {
    /// Positions reported one after another.
    pub points: Vec<Point>,
    /// Delay between two reports in milliseconds.
    pub interval_ms: u64,
}

fn default_fps() -> u32 {
    60
}

fn default_animation_ms() -> u64 {
    300
}

impl DemoConfig {
    /// Loads the config from `path`, or the embedded Berlin config if no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                Self::parse(&json).with_context(|| format!("invalid config {}", path.display()))
            }
            None => Self::parse(DEFAULT_CONFIG).context("invalid embedded config"),
        }
    }

    /// Parses a JSON config.
    pub fn parse(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Animation for camera transitions, `None` if they are instant.
    pub fn animation(&self) -> Option<Animation> {
        if self.animation_ms == 0 {
            return None;
        }

        Some(
            Animation::builder()
                .with_duration(Duration::from_millis(self.animation_ms))
                .build(),
        )
    }

    /// All route vertices.
    pub fn route_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.routes.iter().flat_map(|route| route.points.iter().copied())
    }
}

impl TrackConfig {
    /// Delay between two reports.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl RouteConfig {
    /// Builds the polyline for the route.
    pub fn polyline(&self) -> Result<Polyline, mapview::MapError> {
        let mut builder: PolylineBuilder = Polyline::builder(self.points.iter().copied());

        if let Some(width) = self.width {
            builder = builder.with_width(width);
        }
        if let Some(color) = self.color {
            builder = builder.with_color(color);
        }
        if !self.colors.is_empty() {
            builder = builder.with_colors(self.colors.iter().copied());
        }
        if let Some(width) = self.border_width {
            builder = builder.with_border_width(width);
        }
        if let Some(color) = self.border_color {
            builder = builder.with_border_color(color);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_is_valid() {
        let config = DemoConfig::load(None).unwrap();
        assert_eq!(config.routes.len(), 2);
        assert!(config.track.points.len() >= 2);

        for route in &config.routes {
            route.polyline().unwrap();
        }
    }

    #[test]
    fn rainbow_route_uses_vertex_colors() {
        let config = DemoConfig::load(None).unwrap();
        let rainbow = config.routes[1].polyline().unwrap();
        assert_eq!(rainbow.color_at(0), Color::from_argb(0xFF9400D3));
        assert_eq!(rainbow.color_at(7), Color::from_argb(0xFF9400D3));
    }

    #[test]
    fn defaults_are_applied() {
        let config = DemoConfig::parse(
            r#"{
                "viewport": { "width": 400, "height": 300 },
                "center": { "lat": 52.52, "lon": 13.40 },
                "zoom": 12,
                "routes": [],
                "track": { "points": [], "interval_ms": 100 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.fps, 60);
        assert_eq!(config.padding, 0.0);
        assert!(config.tour.is_empty());
        assert_eq!(
            config.animation().map(|a| a.duration()),
            Some(Duration::from_millis(300))
        );
    }

    #[test]
    fn invalid_point_is_rejected() {
        let result = DemoConfig::parse(
            r#"{
                "viewport": { "width": 400, "height": 300 },
                "center": { "lat": 95.0, "lon": 13.40 },
                "zoom": 12,
                "routes": [],
                "track": { "points": [], "interval_ms": 100 }
            }"#,
        );
        assert!(result.is_err());
    }
}
