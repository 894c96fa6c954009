//! Color type and operations.
//!
//! `Rgba8` carries 8-bit non-premultiplied components. Configuration colors
//! are RGB triples (alpha 255); decorations that need translucency derive a
//! reduced-alpha copy with `with_opacity`.

use std::str::FromStr;

use serde::Deserialize;

use crate::basics::CoverType;
use crate::error::{Error, Result};

/// RGBA color with u8 components in range [0, 255].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "ColorSpec")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BASE_SHIFT: u32 = 8;
    pub const BASE_SCALE: u32 = 1 << Self::BASE_SHIFT;
    pub const BASE_MASK: u32 = Self::BASE_SCALE - 1;
    pub const BASE_MSB: u32 = 1 << (Self::BASE_SHIFT - 1);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from an RGB triple.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Same color with alpha set to `opacity` (clamped to [0, 1]).
    pub fn with_opacity(&self, opacity: f64) -> Self {
        let a = (opacity.clamp(0.0, 1.0) * Self::BASE_MASK as f64 + 0.5) as u8;
        Self { a, ..*self }
    }

    /// RGB components as an array, dropping alpha.
    pub fn to_rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Fixed-point multiply, exact over [0, 255].
    #[inline]
    pub fn multiply(a: u8, b: u8) -> u8 {
        let t: u32 = a as u32 * b as u32 + Self::BASE_MSB;
        (((t >> Self::BASE_SHIFT) + t) >> Self::BASE_SHIFT) as u8
    }

    /// Multiply a color component by a cover.
    #[inline]
    pub fn mult_cover(a: u8, b: CoverType) -> u8 {
        Self::multiply(a, b)
    }

    /// Interpolate p to q by a.
    #[inline]
    pub fn lerp(p: u8, q: u8, a: u8) -> u8 {
        let t = (q as i32 - p as i32) * a as i32 + Self::BASE_MSB as i32 - (p > q) as i32;
        (p as i32 + (((t >> Self::BASE_SHIFT) + t) >> Self::BASE_SHIFT)) as u8
    }

    /// Interpolate toward `c` by `k` in [0, 1], truncating each channel.
    pub fn gradient(&self, c: &Rgba8, k: f64) -> Rgba8 {
        let mix = |p: u8, q: u8| (p as f64 + (q as f64 - p as f64) * k) as u8;
        Rgba8::new(
            mix(self.r, c.r),
            mix(self.g, c.g),
            mix(self.b, c.b),
            mix(self.a, c.a),
        )
    }

    /// Parse a color specification.
    ///
    /// Accepts `#RRGGBB`, `RRGGBB`, `#RGB` and `rgb(r, g, b)`. An empty
    /// string yields black.
    pub fn parse(spec: &str) -> Result<Rgba8> {
        let s = spec.trim();
        if s.is_empty() {
            return Ok(Rgba8::black());
        }
        if let Some(inner) = s
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(inner).ok_or_else(|| unsupported(spec));
        }
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(unsupported(spec));
        }
        match hex.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                match (channel(0), channel(2), channel(4)) {
                    (Ok(r), Ok(g), Ok(b)) => Ok(Rgba8::rgb(r, g, b)),
                    _ => Err(unsupported(spec)),
                }
            }
            // Short form only with a leading '#', as in CSS.
            3 if s.starts_with('#') => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
                match (digit(0), digit(1), digit(2)) {
                    (Ok(r), Ok(g), Ok(b)) => Ok(Rgba8::rgb(r, g, b)),
                    _ => Err(unsupported(spec)),
                }
            }
            _ => Err(unsupported(spec)),
        }
    }
}

fn unsupported(spec: &str) -> Error {
    Error::UnsupportedColorFormat(spec.to_string())
}

fn parse_functional(inner: &str) -> Option<Rgba8> {
    let parts: Vec<u8> = inner
        .split(',')
        .map(|p| p.trim().parse::<u8>().ok())
        .collect::<Option<Vec<_>>>()?;
    match parts.as_slice() {
        [r, g, b] => Some(Rgba8::rgb(*r, *g, *b)),
        _ => None,
    }
}

impl FromStr for Rgba8 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Rgba8::parse(s)
    }
}

impl From<[u8; 3]> for Rgba8 {
    fn from(c: [u8; 3]) -> Self {
        Rgba8::rgb(c[0], c[1], c[2])
    }
}

/// Wire forms accepted for a color in configuration documents.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    Text(String),
    Rgb([u8; 3]),
    Rgba([u8; 4]),
}

impl TryFrom<ColorSpec> for Rgba8 {
    type Error = Error;

    fn try_from(spec: ColorSpec) -> Result<Self> {
        match spec {
            ColorSpec::Text(s) => Rgba8::parse(&s),
            ColorSpec::Rgb(c) => Ok(c.into()),
            ColorSpec::Rgba([r, g, b, a]) => Ok(Rgba8::new(r, g, b, a)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_standard() {
        assert_eq!(Rgba8::parse("#FFFFFF").unwrap(), Rgba8::white());
        assert_eq!(Rgba8::parse("#000000").unwrap(), Rgba8::black());
        assert_eq!(Rgba8::parse("#FF0000").unwrap(), Rgba8::rgb(255, 0, 0));
    }

    #[test]
    fn test_parse_hex_without_hash() {
        assert_eq!(Rgba8::parse("FFFFFF").unwrap(), Rgba8::white());
        assert_eq!("0a0B0c".parse::<Rgba8>().unwrap(), Rgba8::rgb(10, 11, 12));
    }

    #[test]
    fn test_parse_short_and_functional() {
        assert_eq!(Rgba8::parse("#f80").unwrap(), Rgba8::rgb(255, 136, 0));
        assert_eq!(
            Rgba8::parse("rgb(1, 2, 3)").unwrap(),
            Rgba8::rgb(1, 2, 3)
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            Rgba8::parse("ZZZZZZ"),
            Err(Error::UnsupportedColorFormat(_))
        ));
        assert!(matches!(
            Rgba8::parse("123"),
            Err(Error::UnsupportedColorFormat(_))
        ));
        assert!(Rgba8::parse("rgb(1, 2)").is_err());
        assert!(Rgba8::parse("rgb(1, 2, 300)").is_err());
    }

    #[test]
    fn test_parse_empty_is_black() {
        assert_eq!(Rgba8::parse("").unwrap(), Rgba8::black());
        assert_eq!(Rgba8::parse("   ").unwrap(), Rgba8::black());
    }

    #[test]
    fn test_deserialize_forms() {
        let c: Rgba8 = serde_json::from_str("\"#102030\"").unwrap();
        assert_eq!(c, Rgba8::rgb(16, 32, 48));
        let c: Rgba8 = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(c, Rgba8::rgb(1, 2, 3));
        let c: Rgba8 = serde_json::from_str("[1, 2, 3, 4]").unwrap();
        assert_eq!(c, Rgba8::new(1, 2, 3, 4));
        assert!(serde_json::from_str::<Rgba8>("\"nope\"").is_err());
    }

    #[test]
    fn test_lerp_and_multiply() {
        assert_eq!(Rgba8::lerp(0, 255, 255), 255);
        assert_eq!(Rgba8::lerp(0, 255, 0), 0);
        assert_eq!(Rgba8::lerp(100, 200, 128), 150);
        assert_eq!(Rgba8::multiply(255, 255), 255);
        assert_eq!(Rgba8::multiply(255, 0), 0);
        assert_eq!(Rgba8::mult_cover(128, 255), 128);
    }

    #[test]
    fn test_gradient_and_opacity() {
        let top = Rgba8::rgb(240, 253, 244);
        let bottom = Rgba8::rgb(220, 252, 231);
        assert_eq!(top.gradient(&bottom, 0.0), top);
        assert_eq!(top.gradient(&bottom, 0.5), Rgba8::rgb(230, 252, 237));
        assert_eq!(top.with_opacity(0.0).a, 0);
        assert_eq!(top.with_opacity(2.0).a, 255);
    }
}
