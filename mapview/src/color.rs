/// RGBA color used by overlays.
///
/// When the `serde` feature is enabled, colors are (de)serialized as `#RRGGBB` or `#RRGGBBAA`
/// strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// Black.
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    /// White.
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    /// Red.
    pub const RED: Color = Color::rgba(255, 0, 0, 255);
    /// Green.
    pub const GREEN: Color = Color::rgba(0, 255, 0, 255);
    /// Blue.
    pub const BLUE: Color = Color::rgba(0, 0, 255, 255);

    /// Creates a color from its components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from a packed `0xAARRGGBB` value, the layout used by Android color ints.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Packs the color into `0xAARRGGBB`.
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    pub fn try_from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return None;
        }

        let component = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgba(component(0)?, component(2)?, component(4)?, 255)),
            8 => Some(Self::rgba(
                component(0)?,
                component(2)?,
                component(4)?,
                component(6)?,
            )),
            _ => None,
        }
    }

    /// Hex representation `#RRGGBBAA`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }

    /// Returns the same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Red component.
    pub const fn r(&self) -> u8 {
        self.r
    }

    /// Green component.
    pub const fn g(&self) -> u8 {
        self.g
    }

    /// Blue component.
    pub const fn b(&self) -> u8 {
        self.b
    }

    /// Alpha component.
    pub const fn a(&self) -> u8 {
        self.a
    }

    /// Components as floats in `[0, 1]`, the form most GPU backends expect.
    pub fn to_f32_array(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from_hex(&value).ok_or_else(|| format!("invalid hex color: {value}"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}
