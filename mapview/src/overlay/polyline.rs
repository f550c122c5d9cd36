use mapview_types::{Bounds, GeometryError, Point};

use crate::color::Color;
use crate::error::MapError;

/// Minimum number of points a polyline must have.
pub const MIN_POLYLINE_POINTS: usize = 2;

/// Line width used when the builder is not given one.
pub const DEFAULT_POLYLINE_WIDTH: f32 = 4.0;

/// Coloring scheme of a polyline.
#[derive(Debug, Clone, PartialEq)]
pub enum PolylineColors {
    /// Same color along the whole line.
    Uniform(Color),
    /// Color per vertex. If the list is shorter than the point count it is repeated cyclically.
    PerVertex(Vec<Color>),
}

/// Border drawn around the polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineBorder {
    /// Border width in pixels.
    pub width: f32,
    /// Border color.
    pub color: Color,
}

/// Line connecting an ordered sequence of points.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
    bounds: Bounds,
    colors: PolylineColors,
    width: f32,
    border: Option<PolylineBorder>,
}

impl Polyline {
    /// Starts building a polyline through the given points.
    pub fn builder(points: impl IntoIterator<Item = Point>) -> PolylineBuilder {
        PolylineBuilder {
            points: points.into_iter().collect(),
            colors: PolylineColors::Uniform(Color::BLACK),
            width: DEFAULT_POLYLINE_WIDTH,
            border_width: None,
            border_color: None,
        }
    }

    /// Points of the line.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Bounds of all the points.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Coloring scheme as configured.
    pub fn colors(&self) -> &PolylineColors {
        &self.colors
    }

    /// Line width in pixels.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Border, if any.
    pub fn border(&self) -> Option<PolylineBorder> {
        self.border
    }

    /// Color of the vertex at `index`.
    pub fn color_at(&self, index: usize) -> Color {
        match &self.colors {
            PolylineColors::Uniform(color) => *color,
            // The builder guarantees the list is not empty.
            PolylineColors::PerVertex(colors) => colors[index % colors.len()],
        }
    }

    /// Resolved color of every vertex, repeating a short per-vertex list cyclically.
    pub fn vertex_colors(&self) -> Vec<Color> {
        (0..self.points.len()).map(|i| self.color_at(i)).collect()
    }
}

/// Builder for [`Polyline`].
#[derive(Debug, Clone)]
pub struct PolylineBuilder {
    points: Vec<Point>,
    colors: PolylineColors,
    width: f32,
    border_width: Option<f32>,
    border_color: Option<Color>,
}

impl PolylineBuilder {
    /// Sets the line width in pixels.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Uses one color for the whole line.
    pub fn with_color(mut self, color: Color) -> Self {
        self.colors = PolylineColors::Uniform(color);
        self
    }

    /// Uses a color per vertex.
    pub fn with_colors(mut self, colors: impl IntoIterator<Item = Color>) -> Self {
        self.colors = PolylineColors::PerVertex(colors.into_iter().collect());
        self
    }

    /// Sets the border width in pixels. Zero width disables the border.
    pub fn with_border_width(mut self, width: f32) -> Self {
        self.border_width = Some(width);
        self
    }

    /// Sets the border color. Without a border width the border is 1 pixel wide.
    pub fn with_border_color(mut self, color: Color) -> Self {
        self.border_color = Some(color);
        self
    }

    /// Validates the configuration and creates the polyline.
    pub fn build(self) -> Result<Polyline, MapError> {
        if self.points.len() < MIN_POLYLINE_POINTS {
            return Err(GeometryError::NotEnoughPoints {
                required: MIN_POLYLINE_POINTS,
                actual: self.points.len(),
            }
            .into());
        }

        if !self.width.is_finite() || self.width < 0.0 {
            return Err(MapError::InvalidStyle(format!(
                "polyline width must be a non-negative number, got {}",
                self.width
            )));
        }

        if let PolylineColors::PerVertex(colors) = &self.colors {
            if colors.is_empty() {
                return Err(MapError::InvalidStyle("polyline color list is empty".into()));
            }

            if colors.len() > self.points.len() {
                return Err(MapError::InvalidStyle(format!(
                    "polyline has {} colors for {} points",
                    colors.len(),
                    self.points.len()
                )));
            }
        }

        let border = match (self.border_width, self.border_color) {
            (None, None) => None,
            (width, color) => {
                let width = width.unwrap_or(1.0);
                if !width.is_finite() || width < 0.0 {
                    return Err(MapError::InvalidStyle(format!(
                        "polyline border width must be a non-negative number, got {width}"
                    )));
                }

                (width > 0.0).then(|| PolylineBorder {
                    width,
                    color: color.unwrap_or(Color::BLACK),
                })
            }
        };

        let bounds = Bounds::from_points(&self.points)?;

        Ok(Polyline {
            points: self.points,
            bounds,
            colors: self.colors,
            width: self.width,
            border,
        })
    }
}
