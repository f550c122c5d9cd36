/// Position on the map viewport in pixels, measured from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenCoordinate {
    /// Horizontal offset, growing to the right.
    pub x: f64,
    /// Vertical offset, growing downwards.
    pub y: f64,
}

impl ScreenCoordinate {
    /// Creates a new screen coordinate.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the map viewport in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Creates a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Center of the viewport.
    pub fn center(&self) -> ScreenCoordinate {
        ScreenCoordinate::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}
