//! The cell color type and its canonical string form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::ParseColorError;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Unweighted channel average, 0.0..=255.0.
    ///
    /// This is deliberately not a perceptual luminance: background
    /// thresholding compares against the plain `(R+G+B)/3` average.
    #[inline]
    pub fn brightness(self) -> f32 {
        (self.r as f32 + self.g as f32 + self.b as f32) / 3.0
    }

    /// Alpha as a fraction in 0.0..=1.0.
    #[inline]
    pub fn alpha_fraction(self) -> f64 {
        self.a as f64 / 255.0
    }

    /// `#RRGGBB`, uppercase, alpha dropped.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Contents of one grid cell.
///
/// # Example
///
/// ```
/// use pixel_grid::{Color, Rgba};
///
/// let red: Color = "rgba(255,0,0,1)".parse().unwrap();
/// assert_eq!(red, Color::Rgba(Rgba::opaque(255, 0, 0)));
/// assert_eq!(Color::Empty.to_string(), "transparent");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Fully transparent cell
    #[default]
    Empty,
    Rgba(Rgba),
}

impl Color {
    pub const WHITE: Color = Color::Rgba(Rgba::opaque(255, 255, 255));
    pub const BLACK: Color = Color::Rgba(Rgba::opaque(0, 0, 0));

    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, Color::Empty)
    }

    #[inline]
    pub fn rgba(self) -> Option<Rgba> {
        match self {
            Color::Empty => None,
            Color::Rgba(c) => Some(c),
        }
    }
}

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Self {
        Color::Rgba(c)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Empty => f.write_str("transparent"),
            // f64 Display is the shortest string that parses back to the
            // same value, so alpha survives a text round trip exactly.
            Color::Rgba(c) => write!(f, "rgba({},{},{},{})", c.r, c.g, c.b, c.alpha_fraction()),
        }
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse a color string.
    ///
    /// Accepts `transparent`, `#RRGGBB`, `#RGB` (the `#` is optional),
    /// `rgb(r,g,b)` and `rgba(r,g,b,a)` with optional whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseColorError::Empty);
        }
        if s.eq_ignore_ascii_case("transparent") {
            return Ok(Color::Empty);
        }

        let lower = s.to_ascii_lowercase();
        if let Some(body) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
        {
            let body = body
                .strip_suffix(')')
                .ok_or_else(|| ParseColorError::UnknownFormat(s.to_string()))?;
            return parse_components(body).map(Color::Rgba);
        }

        parse_hex(s.strip_prefix('#').unwrap_or(s)).map(Color::Rgba)
    }
}

fn parse_components(body: &str) -> Result<Rgba, ParseColorError> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(ParseColorError::ComponentCount { found: parts.len() });
    }

    let channel = |s: &str| s.parse::<u8>().map_err(ParseColorError::InvalidChannel);
    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;

    let a = match parts.get(3) {
        None => 255,
        Some(alpha) => {
            let fraction: f64 = alpha.parse()?;
            if !(0.0..=1.0).contains(&fraction) {
                return Err(ParseColorError::InvalidAlpha(alpha.to_string()));
            }
            (fraction * 255.0).round() as u8
        }
    };

    Ok(Rgba::new(r, g, b, a))
}

fn parse_hex(hex: &str) -> Result<Rgba, ParseColorError> {
    // Checked before slicing: byte offsets below assume ASCII.
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ParseColorError::UnknownFormat(hex.to_string()));
    }

    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16)?;
            let g = u8::from_str_radix(&hex[2..4], 16)?;
            let b = u8::from_str_radix(&hex[4..6], 16)?;
            Ok(Rgba::opaque(r, g, b))
        }
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
            Ok(Rgba::opaque(digit(0)?, digit(1)?, digit(2)?))
        }
        _ => Err(ParseColorError::InvalidLength),
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
