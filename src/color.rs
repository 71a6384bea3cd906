//! Color code parsing
//!
//! Color codes from the extraction API are normally `#RRGGBB`, but any CSS
//! color string is accepted:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - Functional: `rgb()`, `rgba()`, `hsl()`, `hsla()`, `hwb()`, `oklch()`
//! - Named: `red`, `navy`, `rebeccapurple`, etc.
//!
//! Palette images are opaque RGB, so any alpha component is dropped.

use image::Rgb;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

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
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a color code into an opaque RGB pixel.
///
/// # Examples
///
/// ```
/// use palette_mcp::color::parse_color;
///
/// assert_eq!(parse_color("#2a2b2f").unwrap(), image::Rgb([42, 43, 47]));
/// assert_eq!(parse_color("#F00").unwrap(), image::Rgb([255, 0, 0]));
/// assert_eq!(parse_color("blue").unwrap(), image::Rgb([0, 0, 255]));
/// ```
pub fn parse_color(s: &str) -> Result<Rgb<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }
    match s.strip_prefix('#') {
        Some(hex) => parse_hex(hex),
        None => parse_css(s),
    }
}

fn parse_hex(hex: &str) -> Result<Rgb<u8>, ColorError> {
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }
    // All characters are ASCII hex digits from here on, so byte slicing is safe.
    let channel = |i: usize, width: usize| -> u8 {
        let v = u8::from_str_radix(&hex[i * width..(i + 1) * width], 16).unwrap_or(0);
        if width == 1 {
            v * 17
        } else {
            v
        }
    };
    match hex.len() {
        3 | 4 => Ok(Rgb([channel(0, 1), channel(1, 1), channel(2, 1)])),
        6 | 8 => Ok(Rgb([channel(0, 2), channel(1, 2), channel(2, 2)])),
        len => Err(ColorError::InvalidLength(len)),
    }
}

fn parse_css(s: &str) -> Result<Rgb<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let css = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb = css
        .to_rgb()
        .map_err(|_| ColorError::CssParse(format!("cannot convert '{}' to RGB", s)))?;
    match rgb {
        CssColor::RGBA(rgba) => Ok(Rgb([rgba.red, rgba.green, rgba.blue])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(c) => Ok(Rgb([
                (c.r * 255.0).round() as u8,
                (c.g * 255.0).round() as u8,
                (c.b * 255.0).round() as u8,
            ])),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}
