use crate::foundation::error::{ChoreoError, ChoreoResult};

pub use kurbo::{Point, Rect, Vec2};

/// Pixel dimensions of the drawing surface a sequence renders into.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> ChoreoResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ChoreoError::validation(format!(
                "surface must be finite and positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whole-pixel size used by raster backends.
    pub fn pixel_size(self) -> (u32, u32) {
        (
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }
}

/// Narrow/wide viewport classification selecting one of two layout branches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakpoint {
    Narrow,
    Wide,
}

impl Breakpoint {
    /// Narrow when `width` is strictly below `threshold`.
    pub fn from_width(width: f64, threshold: f64) -> Self {
        if width < threshold {
            Self::Narrow
        } else {
            Self::Wide
        }
    }

    pub fn is_narrow(self) -> bool {
        matches!(self, Self::Narrow)
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn parse_hex(s: &str) -> ChoreoResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(ChoreoError::validation(format!(
                "color must be #rrggbb or #rrggbbaa, got {s:?}"
            )));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| ChoreoError::validation(format!("invalid hex color {s:?}")))
        };
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Per-channel lerp including alpha.
    pub fn mix(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self::rgba(
            ch(self.r, other.r),
            ch(self.g, other.g),
            ch(self.b, other.b),
            ch(self.a, other.a),
        )
    }
}

impl serde::Serialize for Rgba8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Rgba8 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Theme colors threaded explicitly into every render call.
///
/// Hosts refresh this once per frame (for instance after a light/dark switch)
/// and pass it down; nothing in the engine reads colors from ambient state.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Palette {
    pub bg: Rgba8,
    pub fg: Rgba8,
    pub card: Rgba8,
    pub accent: Rgba8,
    pub muted: Rgba8,
    pub green: Rgba8,
    pub red: Rgba8,
    pub blue: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            bg: Rgba8::rgb(0x0b, 0x0c, 0x10),
            fg: Rgba8::rgb(0xe6, 0xe6, 0xe6),
            card: Rgba8::rgb(0x15, 0x17, 0x1c),
            accent: Rgba8::rgb(0xff, 0x9a, 0x5c),
            muted: Rgba8::rgb(0xb5, 0xb5, 0xb5),
            green: Rgba8::rgb(0x69, 0xc8, 0x69),
            red: Rgba8::rgb(0xff, 0x69, 0x78),
            blue: Rgba8::rgb(0x64, 0x96, 0xff),
        }
    }
}

impl Palette {
    /// Light theme counterpart of the default palette.
    pub fn light() -> Self {
        Self {
            bg: Rgba8::rgb(0xfa, 0xfa, 0xf7),
            fg: Rgba8::rgb(0x1c, 0x1c, 0x1f),
            card: Rgba8::rgb(0xff, 0xff, 0xff),
            accent: Rgba8::rgb(0xe0, 0x6a, 0x1e),
            muted: Rgba8::rgb(0x6b, 0x6b, 0x6b),
            ..Self::default()
        }
    }

    /// Seven-entry cycle used to tint individual reward channels.
    pub fn reward_colors(&self) -> [Rgba8; 7] {
        [
            self.green,
            self.accent,
            self.red,
            self.blue,
            Rgba8::rgb(255, 150, 200),
            Rgba8::rgb(79, 210, 200),
            Rgba8::rgb(199, 105, 230),
        ]
    }

    pub fn reward_color(&self, index: usize) -> Rgba8 {
        let colors = self.reward_colors();
        colors[index % colors.len()]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
