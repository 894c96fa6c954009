//! Text drawing on top of the scanline rasterizer.
//!
//! Glyph placement is computed first as `(char, x, y)` triples, `y` being
//! the top of the line box. All glyphs of one string go into a single path
//! and are filled in one pass.

use crate::color::Rgba8;
use crate::font_cache::Font;
use crate::path_storage::PathStorage;
use crate::rasterizer_scanline_aa::{render_scanlines_aa_solid, RasterizerScanlineAa};
use crate::renderer_base::RendererBase;

/// Glyph positions for left-to-right text starting at `(x, y)`.
///
/// Without spacing the string is set as one run; with spacing each glyph
/// advances by its own width plus `spacing`.
pub fn place_horizontal(font: &Font, text: &str, x: f64, y: f64, spacing: f64) -> Vec<(char, f64, f64)> {
    let mut cx = x;
    let mut placed = Vec::with_capacity(text.len());
    for ch in text.chars() {
        placed.push((ch, cx, y));
        cx += font.advance(ch);
        if spacing != 0.0 {
            cx += spacing;
        }
    }
    placed
}

/// Glyph positions for text stacked top to bottom, each glyph centered on
/// `x` and advancing by the font size plus `spacing`.
pub fn place_vertical(font: &Font, text: &str, x: f64, y: f64, spacing: f64) -> Vec<(char, f64, f64)> {
    let step = font.size() + spacing;
    text.chars()
        .enumerate()
        .map(|(i, ch)| (ch, x - font.advance(ch) / 2.0, y + i as f64 * step))
        .collect()
}

pub fn draw_text_horizontal(
    ren: &mut RendererBase,
    font: &Font,
    text: &str,
    x: f64,
    y: f64,
    spacing: f64,
    color: &Rgba8,
) {
    draw_glyphs(ren, font, &place_horizontal(font, text, x, y, spacing), color);
}

pub fn draw_text_vertical(
    ren: &mut RendererBase,
    font: &Font,
    text: &str,
    x: f64,
    y: f64,
    spacing: f64,
    color: &Rgba8,
) {
    draw_glyphs(ren, font, &place_vertical(font, text, x, y, spacing), color);
}

fn draw_glyphs(ren: &mut RendererBase, font: &Font, glyphs: &[(char, f64, f64)], color: &Rgba8) {
    let mut path = PathStorage::new();
    for &(ch, x, y) in glyphs {
        font.add_glyph(ch, x, y, &mut path);
    }
    if path.is_empty() {
        return;
    }
    let mut ras = RasterizerScanlineAa::new();
    ras.add_path(&mut path, 0);
    render_scanlines_aa_solid(&mut ras, ren, color);
}

// ============================================================================
// Tests
// ============================================================================
