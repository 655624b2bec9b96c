use crate::foundation::error::{RasterkitError, RasterkitResult};

/// Opaque sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

/// Label color chosen for readability on top of a swatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelColor {
    /// `#000000`
    Black,
    /// `#ffffff`
    White,
}

impl LabelColor {
    /// The label color as RGB.
    pub fn rgb(self) -> Rgb {
        match self {
            Self::Black => Rgb::new(0, 0, 0),
            Self::White => Rgb::new(255, 255, 255),
        }
    }
}

impl Rgb {
    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (the `#` is optional, hex digits are case-insensitive).
    pub fn from_hex(s: &str) -> RasterkitResult<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bad = || RasterkitError::validation(format!("invalid hex color '{s}'"));
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        match hex.len() {
            3 => {
                let d = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
                Ok(Self::new(
                    d(0).map_err(|_| bad())?,
                    d(1).map_err(|_| bad())?,
                    d(2).map_err(|_| bad())?,
                ))
            }
            6 => {
                let d = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                Ok(Self::new(
                    d(0).map_err(|_| bad())?,
                    d(2).map_err(|_| bad())?,
                    d(4).map_err(|_| bad())?,
                ))
            }
            _ => Err(bad()),
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Perceptual luminance in `0..=1` (`0.299 R + 0.587 G + 0.114 B`).
    pub fn luminance(self) -> f64 {
        (0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b))
            / 255.0
    }

    /// Black on light colors (luminance strictly above 0.5), white otherwise.
    pub fn contrast_label(self) -> LabelColor {
        if self.luminance() > 0.5 {
            LabelColor::Black
        } else {
            LabelColor::White
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/color.rs"]
mod tests;
