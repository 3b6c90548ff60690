//! RGBA color type, hex parsing, and the distance metric used by the fill
//! engine. Distances are plain Euclidean over 8-bit channels - no gamma
//! correction or perceptual weighting.

use crate::error::CanvasError;

/// An 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Color with alpha forced to 255
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a `#rgb` or `#rrggbb` hex string (leading `#` optional).
    /// 3-digit form expands by doubling each nibble (`abc` -> `aabbcc`).
    /// Alpha is always 255 - fill colors are opaque.
    pub fn from_hex(hex: &str) -> Result<Self, CanvasError> {
        let s = hex.strip_prefix('#').unwrap_or(hex);
        let expanded: String = match s.len() {
            3 => s.chars().flat_map(|c| [c, c]).collect(),
            6 => s.to_string(),
            _ => return Err(CanvasError::InvalidColor(hex.to_string())),
        };
        let num = u32::from_str_radix(&expanded, 16)
            .map_err(|_| CanvasError::InvalidColor(hex.to_string()))?;
        Ok(Self::opaque(
            ((num >> 16) & 255) as u8,
            ((num >> 8) & 255) as u8,
            (num & 255) as u8,
        ))
    }

    /// Format as `#rrggbb` (alpha dropped)
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Euclidean distance over all four channels.
    /// Used for the fill-region tolerance test.
    pub fn distance(self, other: Rgba) -> f32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        let da = self.a as i32 - other.a as i32;
        ((dr * dr + dg * dg + db * db + da * da) as f32).sqrt()
    }

    /// Euclidean distance over RGB only, ignoring alpha.
    /// Used for the near-white test in edge softening.
    pub fn distance_rgb(self, other: Rgba) -> f32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        ((dr * dr + dg * dg + db * db) as f32).sqrt()
    }
}
