//! Color samples and palette color parsing
//!
//! [`Color`] is the RGBA sample every image in the crate resolves to. Palette
//! definitions in `spritec.toml` are written as CSS color strings:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - Functional: `rgb()`, `rgba()`, `hsl()`, `hsla()`, `hwb()`
//! - Named: `red`, `blue`, `transparent`, etc.

use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use serde::Serialize;
use thiserror::Error;

/// An RGBA color sample, one byte per channel.
///
/// Alpha is carried through the pipeline but ignored by the packed 15-bit
/// encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from three channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Squared euclidean distance over the RGB channels.
    pub fn distance_sq(self, other: Color) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a CSS color string into a [`Color`].
///
/// Hex colors take a fast path; everything else goes through lightningcss.
///
/// # Examples
///
/// ```
/// use spritec::color::{parse_color, Color};
///
/// assert_eq!(parse_color("#F00").unwrap(), Color::rgb(255, 0, 0));
/// assert_eq!(parse_color("rgb(0, 255, 0)").unwrap(), Color::rgb(0, 255, 0));
/// assert_eq!(parse_color("blue").unwrap(), Color::rgb(0, 0, 255));
/// ```
pub fn parse_color(s: &str) -> Result<Color, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    parse_css_color(s)
}

fn parse_hex_color(hex: &str) -> Result<Color, ColorError> {
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    let nibble = |i: usize| -> u8 { hex_value(hex.as_bytes()[i]) * 17 };
    let pair = |i: usize| -> u8 { hex_value(hex.as_bytes()[i]) * 16 + hex_value(hex.as_bytes()[i + 1]) };

    match hex.len() {
        3 => Ok(Color::rgb(nibble(0), nibble(1), nibble(2))),
        4 => Ok(Color::new(nibble(0), nibble(1), nibble(2), nibble(3))),
        6 => Ok(Color::rgb(pair(0), pair(2), pair(4))),
        8 => Ok(Color::new(pair(0), pair(2), pair(4), pair(6))),
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// Value of an ASCII hex digit. Callers have already validated the byte.
fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

fn parse_css_color(s: &str) -> Result<Color, ColorError> {
    use lightningcss::values::color::FloatColor;

    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb_color = css_color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Color::new(rgba.red, rgba.green, rgba.blue, rgba.alpha)),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => {
                let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
                Ok(Color::new(channel(rgb.r), channel(rgb.g), channel(rgb.b), channel(rgb.alpha)))
            }
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}
