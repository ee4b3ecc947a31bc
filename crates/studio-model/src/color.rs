//! RGBA colors parsed from CSS-style hex notation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vantage_common::error::VantageError;

/// An 8-bit-per-channel, straight-alpha color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb`, or `#rrggbbaa` (case-insensitive).
    pub fn from_hex(value: &str) -> Result<Self, VantageError> {
        let invalid = || VantageError::InvalidColor {
            value: value.to_string(),
        };
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);

        let parsed = match hex.len() {
            3 => (nibble(0), nibble(1), nibble(2), Ok(0xff)),
            4 => (nibble(0), nibble(1), nibble(2), nibble(3)),
            6 => (byte(0), byte(2), byte(4), Ok(0xff)),
            8 => (byte(0), byte(2), byte(4), byte(6)),
            _ => return Err(invalid()),
        };

        match parsed {
            (Ok(r), Ok(g), Ok(b), Ok(a)) => Ok(Self { r, g, b, a }),
            _ => Err(invalid()),
        }
    }

    /// Hex form, `#rrggbb` when opaque and `#rrggbbaa` otherwise.
    pub fn to_hex(&self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Same color with its alpha multiplied by `factor` (clamped to `[0, 1]`).
    pub fn with_opacity(self, factor: f32) -> Self {
        let a = (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// White with the given opacity.
    pub fn white_alpha(opacity: f32) -> Self {
        Self::WHITE.with_opacity(opacity)
    }

    /// Black with the given opacity.
    pub fn black_alpha(opacity: f32) -> Self {
        Self::BLACK.with_opacity(opacity)
    }

    /// Whether the RGB channels are pure white, ignoring alpha.
    pub fn is_white(&self) -> bool {
        self.r == 0xff && self.g == 0xff && self.b == 0xff
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = VantageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = VantageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_forms() {
        assert_eq!(Color::from_hex("#0c0c0e").unwrap(), Color::rgb(12, 12, 14));
        assert_eq!(Color::from_hex("#FFF").unwrap(), Color::WHITE);
        assert_eq!(
            Color::from_hex("#ffffff20").unwrap(),
            Color::rgba(255, 255, 255, 0x20)
        );
        assert_eq!(Color::from_hex("#0008").unwrap(), Color::rgba(0, 0, 0, 0x88));
    }

    #[test]
    fn test_rejects_malformed_values() {
        for value in ["0c0c0e", "#12345", "#gggggg", "", "#"] {
            assert!(
                matches!(Color::from_hex(value), Err(VantageError::InvalidColor { .. })),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_hex_roundtrip() {
        let color = Color::from_hex("#2D2D3A").unwrap();
        assert_eq!(color.to_hex(), "#2d2d3a");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_hex(), "#01020304");
    }

    #[test]
    fn test_is_white_ignores_alpha() {
        assert!(Color::from_hex("#FFFFFF").unwrap().is_white());
        assert!(Color::white_alpha(0.5).is_white());
        assert!(!Color::from_hex("#0f172a").unwrap().is_white());
    }

    #[test]
    fn test_with_opacity_scales_alpha() {
        assert_eq!(Color::WHITE.with_opacity(0.1).a, 26);
        assert_eq!(Color::black_alpha(0.4).a, 102);
    }
}
