use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::{Affine, Rect, Vec2};

/// 1-based index of one image in the ordered frame sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct FrameNumber(pub u32);

impl FrameNumber {
    /// First frame of every sequence.
    pub const FIRST: Self = Self(1);

    /// Raw 1-based value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Clamp into `[1, total]`.
    pub fn clamp_to(self, total: u32) -> Self {
        Self(self.0.clamp(1, total.max(1)))
    }
}

impl std::fmt::Display for FrameNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canvas size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CssSize {
    /// CSS width.
    pub width: f64,
    /// CSS height.
    pub height: f64,
}

impl CssSize {
    /// Both dimensions must be finite and positive.
    pub fn new(width: f64, height: f64) -> ReelResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ReelError::validation(format!(
                "css size must be finite and > 0, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Backing-store size for the given pixel ratio, rounded up.
    pub fn device_pixels(self, pixel_ratio: f64) -> (u32, u32) {
        let w = (self.width * pixel_ratio).ceil().max(1.0);
        let h = (self.height * pixel_ratio).ceil().max(1.0);
        (w as u32, h as u32)
    }
}

/// Straight-alpha RGBA8 color, serialized as `#rrggbb` or `#rrggbbaa`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha (not premultiplied).
    pub a: u8,
}

impl Rgba8 {
    /// Color with full alpha.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn parse_hex(s: &str) -> ReelResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ReelError::validation(format!("color '{s}' must start with '#'")))?;
        if !hex.is_ascii() {
            return Err(ReelError::validation(format!("color '{s}' is not ascii hex")));
        }
        let channel = |i: usize| -> ReelResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| ReelError::validation(format!("color '{s}': {e}")))
        };
        match hex.len() {
            6 => Ok(Self::opaque(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => Err(ReelError::validation(format!(
                "color '{s}' must be #rrggbb or #rrggbbaa"
            ))),
        }
    }

    /// Inverse of `parse_hex`; alpha is omitted when opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl serde::Serialize for Rgba8 {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Rgba8 {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
