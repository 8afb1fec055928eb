//! Background colors and the default palette

use rand::seq::SliceRandom;
use rand::Rng;

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Backgrounds picked when the caller does not supply one
pub const PALETTE: [Color; 6] = [
    Color::rgb(0xFF, 0x57, 0x33),
    Color::rgb(0x33, 0xFF, 0x57),
    Color::rgb(0x33, 0x57, 0xFF),
    Color::rgb(0xFF, 0xFF, 0x33),
    Color::rgb(0xFF, 0x33, 0xFF),
    Color::rgb(0x33, 0xFF, 0xFF),
];

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pick a palette entry uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *PALETTE.choose(rng).unwrap_or(&PALETTE[0])
    }

    /// Uppercase `#RRGGBB` form
    pub fn to_hex(&self) -> String {
        format!("#{}", hex::encode_upper([self.r, self.g, self.b]))
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, 255)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Color {
    type Err = String;

    /// Accepts `#RRGGBB`, `RRGGBB` and `#RGB`, then any CSS color
    /// (`red`, `rgb(255, 0, 0)`, `#RRGGBBAA`, ...). Alpha is dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(color) = parse_hex(s) {
            return Ok(color);
        }

        let [r, g, b, _alpha] = csscolorparser::parse(s)
            .map_err(|e| format!("Invalid color: {} ({})", s, e))?
            .to_rgba8();
        Ok(Color::rgb(r, g, b))
    }
}

fn parse_hex(s: &str) -> Option<Color> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    let expanded = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => digits.to_string(),
        _ => return None,
    };

    let bytes = hex::decode(&expanded).ok()?;
    Some(Color::rgb(bytes[0], bytes[1], bytes[2]))
}
