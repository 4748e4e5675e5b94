//! Core value types shared by the history, overlay and filter modules.
//!
//! Colors arrive either as hex strings (from a color picker or config file) or as
//! ready-made triples. Both forms are kept in one tagged enum and normalized to an
//! [`Rgb`] triple at the rasterization boundary.

use crate::core::error::ColorError;
use image::{DynamicImage, Rgb as RgbPixel, RgbImage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An 8-bit RGB color triple.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

/// A color as supplied by a caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Color {
    /// Hex string, `"#RRGGBB"` or `"RRGGBB"`. Decoded lazily.
    Hex(String),
    /// Already-decoded triple, used as is.
    Triple(Rgb),
}

// ============================================================================
// Rgb Implementation
// ============================================================================

impl Rgb {
    /// Blank canvas color.
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    /// Black.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Create a color from RGB components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string.
    ///
    /// Supports `"#RRGGBB"` and `"RRGGBB"`, case-insensitive.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);

        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorError::InvalidLength {
                input: hex.to_string(),
                len: digits.chars().count(),
            });
        }

        // from_str_radix alone would accept a leading '+'
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit {
                input: hex.to_string(),
                digits: digits.to_string(),
            });
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range.clone()], 16).map_err(|_| ColorError::InvalidDigit {
                input: hex.to_string(),
                digits: digits[range].to_string(),
            })
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Convert to an uppercase `"#RRGGBB"` string.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Rec. 601 luma, used when drawing onto single-channel images.
    pub fn luma(&self) -> u8 {
        let y = 0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32;
        y.round().clamp(0.0, 255.0) as u8
    }

    /// Channels as an `[r, g, b]` array.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ============================================================================
// Color Implementation
// ============================================================================

impl Color {
    /// Build a hex color without decoding it.
    pub fn hex(value: impl Into<String>) -> Self {
        Color::Hex(value.into())
    }

    /// Normalize to a triple. Triples pass through untouched.
    pub fn resolve(&self) -> Result<Rgb, ColorError> {
        match self {
            Color::Hex(hex) => Rgb::from_hex(hex),
            Color::Triple(rgb) => Ok(*rgb),
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Triple(rgb)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from(triple: (u8, u8, u8)) -> Self {
        Color::Triple(triple.into())
    }
}

impl From<&str> for Color {
    fn from(hex: &str) -> Self {
        Color::Hex(hex.to_string())
    }
}

impl From<String> for Color {
    fn from(hex: String) -> Self {
        Color::Hex(hex)
    }
}

/// Create a solid 3-channel canvas.
pub fn blank_canvas(width: u32, height: u32, fill: Rgb) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, RgbPixel(fill.to_array())))
}
