//! Built-in binary raster font.
//!
//! A classic 5x7 dot-matrix face covering printable ASCII. Each glyph is
//! five column bytes, least significant bit at the top row. Glyphs sit in
//! a 6x8 cell scaled so the cell height equals the requested font size,
//! and are emitted as unit squares so they rasterize like any other path.
//!
//! This font needs no files and is the last resort of font resolution.

use crate::basics::{CoverType, PointD, COVER_FULL};
use crate::path_storage::PathStorage;

const FIRST_CHAR: u32 = 0x20;
const GLYPH_COLS: usize = 5;
const GLYPH_ROWS: usize = 7;
const CELL_WIDTH: f64 = 6.0;
const CELL_HEIGHT: f64 = 8.0;

#[rustfmt::skip]
static FONT_5X7: [[u8; GLYPH_COLS]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x00, 0x08, 0x14, 0x22, 0x41], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x41, 0x22, 0x14, 0x08, 0x00], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x01, 0x01], // F
    [0x3E, 0x41, 0x41, 0x51, 0x32], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x04, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x7F, 0x20, 0x18, 0x20, 0x7F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x03, 0x04, 0x78, 0x04, 0x03], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x00, 0x7F, 0x41, 0x41], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x41, 0x41, 0x7F, 0x00, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x08, 0x14, 0x54, 0x54, 0x3C], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x00, 0x7F, 0x10, 0x28, 0x44], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x08, 0x04, 0x08, 0x10, 0x08], // ~
];

/// The built-in font at one pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphRasterBin {
    size: f64,
}

impl GlyphRasterBin {
    pub fn new(size: f64) -> Self {
        Self { size }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    /// Edge length of one dot.
    pub fn unit(&self) -> f64 {
        self.size / CELL_HEIGHT
    }

    /// Distance from the cell top to the baseline.
    pub fn ascent(&self) -> f64 {
        GLYPH_ROWS as f64 * self.unit()
    }

    /// Every character, known or not, advances one cell.
    pub fn advance(&self, _ch: char) -> f64 {
        CELL_WIDTH * self.unit()
    }

    pub fn width(&self, s: &str) -> f64 {
        s.chars().map(|ch| self.advance(ch)).sum()
    }

    pub fn has_glyph(ch: char) -> bool {
        Self::columns(ch).is_some()
    }

    fn columns(ch: char) -> Option<&'static [u8; GLYPH_COLS]> {
        let code = (ch as u32).checked_sub(FIRST_CHAR)?;
        FONT_5X7.get(code as usize)
    }

    /// Binary coverage of row `i` (0 = top) of `ch`, one entry per column.
    /// Unknown characters and rows below the glyph are empty.
    pub fn span(ch: char, i: usize) -> [CoverType; GLYPH_COLS] {
        let mut span = [0; GLYPH_COLS];
        if let Some(cols) = Self::columns(ch).filter(|_| i < GLYPH_ROWS) {
            for (cover, col) in span.iter_mut().zip(cols) {
                if col >> i & 1 != 0 {
                    *cover = COVER_FULL;
                }
            }
        }
        span
    }

    /// Append `ch` with its cell's top-left corner at `(x, y)`. Characters
    /// outside the table draw as an outlined box.
    pub fn add_glyph(&self, ch: char, x: f64, y: f64, path: &mut PathStorage) {
        let u = self.unit();
        if !Self::has_glyph(ch) {
            add_tofu(path, x + u * 0.5, y, u * 5.0, u * 7.0, u);
            return;
        }
        for row in 0..GLYPH_ROWS {
            for (col, cover) in Self::span(ch, row).iter().enumerate() {
                if *cover != 0 {
                    let x1 = x + col as f64 * u;
                    let y1 = y + row as f64 * u;
                    add_rect(path, x1, y1, x1 + u, y1 + u, true);
                }
            }
        }
    }
}

/// Placeholder box for missing glyphs: an outer rectangle with an
/// opposite-wound inner one, leaving a frame of thickness `t`.
pub(crate) fn add_tofu(path: &mut PathStorage, x: f64, y: f64, w: f64, h: f64, t: f64) {
    add_rect(path, x, y, x + w, y + h, true);
    if w > 2.0 * t && h > 2.0 * t {
        add_rect(path, x + t, y + t, x + w - t, y + h - t, false);
    }
}

fn add_rect(path: &mut PathStorage, x1: f64, y1: f64, x2: f64, y2: f64, positive: bool) {
    let mut pts = [
        PointD::new(x1, y1),
        PointD::new(x2, y1),
        PointD::new(x2, y2),
        PointD::new(x1, y2),
    ];
    if !positive {
        pts.reverse();
    }
    path.add_polygon(&pts);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let f = GlyphRasterBin::new(16.0);
        assert_eq!(f.unit(), 2.0);
        assert_eq!(f.ascent(), 14.0);
        assert_eq!(f.advance('A'), 12.0);
        assert_eq!(f.advance('界'), 12.0);
        assert_eq!(f.width("abc"), 36.0);
    }

    #[test]
    fn test_coverage() {
        assert!(GlyphRasterBin::has_glyph(' '));
        assert!(GlyphRasterBin::has_glyph('~'));
        assert!(!GlyphRasterBin::has_glyph('\u{7f}'));
        assert!(!GlyphRasterBin::has_glyph('é'));
        assert!(!GlyphRasterBin::has_glyph('\n'));
    }

    #[test]
    fn test_span_rows() {
        // 'T': top row full, stem in the middle column below.
        assert_eq!(GlyphRasterBin::span('T', 0), [255; 5]);
        assert_eq!(GlyphRasterBin::span('T', 3), [0, 0, 255, 0, 0]);
        // '_' only on the bottom row.
        assert_eq!(GlyphRasterBin::span('_', 0), [0; 5]);
        assert_eq!(GlyphRasterBin::span('_', 6), [255; 5]);
        assert_eq!(GlyphRasterBin::span('_', 7), [0; 5]);
    }

    #[test]
    fn test_add_glyph_squares() {
        let f = GlyphRasterBin::new(8.0);
        let mut path = PathStorage::new();
        f.add_glyph('-', 10.0, 20.0, &mut path);
        assert_eq!(path.polygon_areas(), [1.0; 5]);
        let r = path.bounding_rect().unwrap();
        assert_eq!((r.x1, r.y1, r.x2, r.y2), (10.0, 23.0, 15.0, 24.0));

        let mut blank = PathStorage::new();
        f.add_glyph(' ', 0.0, 0.0, &mut blank);
        assert!(blank.is_empty());
    }

    #[test]
    fn test_tofu_has_hole() {
        let f = GlyphRasterBin::new(8.0);
        let mut path = PathStorage::new();
        f.add_glyph('界', 0.0, 0.0, &mut path);
        assert_eq!(path.polygon_areas(), [35.0, -15.0]);
    }
}
