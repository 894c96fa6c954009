//! Font resolution: (style, size) -> drawable glyph source.
//!
//! Lookup order is an explicitly configured font file, then the platform
//! candidate table for the requested style, then the built-in bitmap
//! font. Resolution never fails; every miss degrades one step and is
//! logged. Parsed faces are cached per style, so a scene with many text
//! items reads each font file once.

use std::collections::HashMap;
#[cfg(feature = "font")]
use std::path::Path;
use std::path::PathBuf;

#[cfg(feature = "font")]
use log::debug;
use log::warn;

#[cfg(feature = "font")]
use crate::font_engine::FontEngine;
use crate::glyph_raster_bin::GlyphRasterBin;
#[cfg(feature = "font")]
use crate::glyph_raster_bin::add_tofu;
use crate::path_storage::PathStorage;
use crate::scene::FontStyle;

/// Where fonts come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FontSource {
    /// Platform candidate table.
    #[default]
    System,
    /// A specific font file, used for every style.
    File(PathBuf),
    /// Built-in bitmap font only; output is identical on every host.
    Builtin,
}

// ============================================================================
// Candidate table
// ============================================================================

#[cfg(target_os = "windows")]
#[cfg(feature = "font")]
fn candidates(style: FontStyle) -> &'static [&'static str] {
    match style {
        FontStyle::Serif => &[
            r"C:\Windows\Fonts\simsun.ttc",
            r"C:\Windows\Fonts\stsong.ttf",
            r"C:\Windows\Fonts\times.ttf",
        ],
        FontStyle::Sans => &[
            r"C:\Windows\Fonts\msyh.ttc",
            r"C:\Windows\Fonts\msyh.ttf",
            r"C:\Windows\Fonts\simhei.ttf",
            r"C:\Windows\Fonts\arial.ttf",
        ],
        FontStyle::Mono => &[r"C:\Windows\Fonts\consola.ttf", r"C:\Windows\Fonts\cour.ttf"],
    }
}

#[cfg(target_os = "macos")]
#[cfg(feature = "font")]
fn candidates(style: FontStyle) -> &'static [&'static str] {
    match style {
        FontStyle::Serif => &[
            "/System/Library/Fonts/Supplemental/Songti.ttc",
            "/System/Library/Fonts/Songti.ttc",
            "/Library/Fonts/Songti.ttc",
            "/System/Library/Fonts/Times.ttc",
        ],
        FontStyle::Sans => &[
            "/System/Library/Fonts/PingFang.ttc",
            "/System/Library/Fonts/Helvetica.ttc",
            "/Library/Fonts/Arial.ttf",
        ],
        FontStyle::Mono => &["/System/Library/Fonts/Menlo.ttc", "/Library/Fonts/Courier New.ttf"],
    }
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
#[cfg(feature = "font")]
fn candidates(style: FontStyle) -> &'static [&'static str] {
    match style {
        FontStyle::Serif => &[
            "/usr/share/fonts/opentype/noto/NotoSerifCJK-Regular.ttc",
            "/usr/share/fonts/noto-cjk/NotoSerifCJK-Regular.ttc",
            "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
            "/usr/share/fonts/dejavu/DejaVuSerif.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
        ],
        FontStyle::Sans => &[
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        ],
        FontStyle::Mono => &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
            "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
        ],
    }
}

// ============================================================================
// Font
// ============================================================================

/// A resolved font at one pixel size.
#[derive(Debug, Clone)]
pub enum Font {
    #[cfg(feature = "font")]
    TrueType(FontEngine),
    Builtin(GlyphRasterBin),
}

impl Font {
    pub fn size(&self) -> f64 {
        match self {
            #[cfg(feature = "font")]
            Font::TrueType(engine) => engine.height(),
            Font::Builtin(bin) => bin.size(),
        }
    }

    /// Distance from a text item's top edge to its baseline.
    pub fn ascent(&self) -> f64 {
        match self {
            #[cfg(feature = "font")]
            Font::TrueType(engine) => engine.ascender(),
            Font::Builtin(bin) => bin.ascent(),
        }
    }

    pub fn advance(&self, ch: char) -> f64 {
        match self {
            #[cfg(feature = "font")]
            Font::TrueType(engine) => engine
                .advance(ch)
                .unwrap_or_else(|| engine.fallback_advance()),
            Font::Builtin(bin) => bin.advance(ch),
        }
    }

    pub fn text_width(&self, s: &str) -> f64 {
        s.chars().map(|ch| self.advance(ch)).sum()
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Font::Builtin(_))
    }

    /// Append the outline of `ch` with the top-left of its line box at
    /// `(x, y)`. Missing glyphs become a framed box.
    pub fn add_glyph(&self, ch: char, x: f64, y: f64, path: &mut PathStorage) {
        match self {
            #[cfg(feature = "font")]
            Font::TrueType(engine) => {
                let baseline = y + engine.ascender();
                if !engine.add_glyph(ch, x, baseline, path) && !ch.is_whitespace() {
                    let adv = engine.fallback_advance();
                    let h = engine.ascender() * 0.8;
                    let t = (engine.height() / 16.0).max(1.0);
                    add_tofu(path, x + adv * 0.1, baseline - h, adv * 0.8, h, t);
                }
            }
            Font::Builtin(bin) => bin.add_glyph(ch, x, y, path),
        }
    }

    pub fn outline(&self, ch: char, x: f64, y: f64) -> PathStorage {
        let mut path = PathStorage::new();
        self.add_glyph(ch, x, y, &mut path);
        path
    }
}

// ============================================================================
// FontCache
// ============================================================================

/// Resolves fonts for the renderer and remembers parsed faces.
#[derive(Debug, Default)]
pub struct FontCache {
    source: FontSource,
    #[cfg(feature = "font")]
    faces: HashMap<FontStyle, Option<FontEngine>>,
    #[cfg(not(feature = "font"))]
    faces: HashMap<FontStyle, Option<()>>,
}

impl FontCache {
    pub fn new(source: FontSource) -> Self {
        Self {
            source,
            faces: HashMap::new(),
        }
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    /// Font for `style` at `size` pixels. Falls back to the built-in font
    /// when nothing loadable is found.
    pub fn resolve(&mut self, style: FontStyle, size: f64) -> Font {
        #[cfg(feature = "font")]
        {
            let source = &self.source;
            let face = self
                .faces
                .entry(style)
                .or_insert_with(|| load_face(source, style));
            if let Some(engine) = face {
                return Font::TrueType(engine.clone().with_height(size));
            }
        }
        #[cfg(not(feature = "font"))]
        {
            self.faces.entry(style).or_insert_with(|| {
                if self.source != FontSource::Builtin {
                    warn!("built without TrueType support, using built-in font for {style:?}");
                }
                None
            });
        }
        Font::Builtin(GlyphRasterBin::new(size))
    }
}

#[cfg(feature = "font")]
fn load_face(source: &FontSource, style: FontStyle) -> Option<FontEngine> {
    let explicit = match source {
        FontSource::Builtin => return None,
        FontSource::File(path) => Some(path.as_path()),
        FontSource::System => None,
    };
    let face = explicit
        .into_iter()
        .chain(candidates(style).iter().map(Path::new))
        .find_map(try_load);
    if face.is_none() {
        warn!("no usable font for {style:?}, using built-in font");
    }
    face
}

#[cfg(feature = "font")]
fn try_load(path: &Path) -> Option<FontEngine> {
    let data = std::fs::read(path).ok()?;
    match FontEngine::from_data(data, 0) {
        Ok(engine) => {
            debug!("loaded font {}", path.display());
            Some(engine)
        }
        Err(e) => {
            warn!("cannot parse font {}: {e}", path.display());
            None
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
    fn test_builtin_source() {
        let mut cache = FontCache::new(FontSource::Builtin);
        for style in [FontStyle::Serif, FontStyle::Sans, FontStyle::Mono] {
            let font = cache.resolve(style, 48.0);
            assert!(font.is_builtin());
            assert_eq!(font.size(), 48.0);
            assert_eq!(font.ascent(), 42.0);
            assert_eq!(font.text_width("ab"), 72.0);
        }
    }

    #[test]
    fn test_missing_file_never_fails() {
        let mut cache = FontCache::new(FontSource::File("/nonexistent/font.ttf".into()));
        let font = cache.resolve(FontStyle::Sans, 20.0);
        assert_eq!(font.size(), 20.0);
        assert!(font.advance('a') > 0.0);
        // Cached: a second lookup yields the same kind of font.
        let again = cache.resolve(FontStyle::Sans, 30.0);
        assert_eq!(again.is_builtin(), font.is_builtin());
        assert_eq!(again.size(), 30.0);
    }

    #[test]
    fn test_outline_positions() {
        let font = Font::Builtin(GlyphRasterBin::new(16.0));
        let path = font.outline('I', 100.0, 10.0);
        let r = path.bounding_rect().unwrap();
        assert!(r.x1 >= 100.0 && r.x2 <= 100.0 + font.advance('I'));
        assert!(r.y1 >= 10.0 && r.y2 <= 10.0 + font.ascent());
        assert!(font.outline(' ', 0.0, 0.0).is_empty());
    }

    #[cfg(feature = "font")]
    #[test]
    fn test_candidates_listed_for_every_style() {
        for style in [FontStyle::Serif, FontStyle::Sans, FontStyle::Mono] {
            assert!(!candidates(style).is_empty());
        }
    }
}
