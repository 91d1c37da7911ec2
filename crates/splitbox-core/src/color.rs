// ABOUTME: Color representation and hex conversion utilities.
// ABOUTME: Provides the preset swatches offered for region backgrounds.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Soft red swatch (#ff9999)
    pub const ROSE: Self = Self::rgb(0xff, 0x99, 0x99);

    /// Soft green swatch (#99ff99)
    pub const MINT: Self = Self::rgb(0x99, 0xff, 0x99);

    /// Soft blue swatch (#9999ff)
    pub const PERIWINKLE: Self = Self::rgb(0x99, 0x99, 0xff);

    pub const LEMON: Self = Self::rgb(0xff, 0xff, 0x99);
    pub const ORCHID: Self = Self::rgb(0xff, 0x99, 0xff);
    pub const AQUA: Self = Self::rgb(0x99, 0xff, 0xff);

    pub fn presets() -> Vec<Color> {
        vec![
            Self::ROSE,
            Self::MINT,
            Self::PERIWINKLE,
            Self::LEMON,
            Self::ORCHID,
            Self::AQUA,
        ]
    }

    /// Parse `#rrggbb` or the short `#rgb` form
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                // #abc expands to #aabbcc
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Some(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear [0, 1] RGBA for renderers
    pub fn to_rgba(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            1.0,
        ]
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid hex color: {value}"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
