//! Scene → image file.
//!
//! The scene is drawn on a canvas supersampled by `scale`, downsampled
//! with a Lanczos filter, then encoded under a byte budget. When the first
//! encoding is too large the shrink policy trades colors, then pixels, for
//! size, and finally writes the last attempt regardless.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbImage;
use log::{debug, info};

use crate::background::draw_background;
use crate::basics::PointD;
use crate::codec::{ImageCodec, PngCodec};
use crate::config::LayoutMode;
use crate::error::Result;
use crate::font_cache::{FontCache, FontSource};
use crate::line_styles::style_ops;
use crate::naming::{output_file_name, timestamp_now};
use crate::path_storage::PathStorage;
use crate::rasterizer_scanline_aa::{render_scanlines_aa_solid, RasterizerScanlineAa};
use crate::renderer_base::RendererBase;
use crate::renderer_text::{draw_text_horizontal, draw_text_vertical};
use crate::scene::{LineItem, Scene, TextItem};

pub const DEFAULT_SCALE: f64 = 2.0;
/// Minimum logical canvas height.
pub const MIN_HEIGHT: u32 = 400;
pub const DEFAULT_BYTE_BUDGET: usize = 1_000_000;
pub const SHRINK_ATTEMPTS: usize = 5;
const SHRINK_FACTOR: f64 = 0.9;
const MIN_PALETTE: usize = 32;

/// Draws scenes and writes them through an [`ImageCodec`].
#[derive(Debug)]
pub struct Renderer<C: ImageCodec = PngCodec> {
    codec: C,
    scale: f64,
    byte_budget: usize,
    fonts: FontCache,
}

impl Renderer<PngCodec> {
    pub fn new(fonts: FontSource) -> Self {
        Self::with_codec(PngCodec, fonts)
    }
}

impl<C: ImageCodec> Renderer<C> {
    pub fn with_codec(codec: C, fonts: FontSource) -> Self {
        Self {
            codec,
            scale: DEFAULT_SCALE,
            byte_budget: DEFAULT_BYTE_BUDGET,
            fonts: FontCache::new(fonts),
        }
    }

    pub fn byte_budget(mut self, bytes: usize) -> Self {
        self.byte_budget = bytes;
        self
    }

    /// Supersampling factor; values below 1 are clamped to 1.
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale.max(1.0);
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Render `scene` and write it into `dest_dir`, named after
    /// `naming_seed`. Returns the written path.
    pub fn render(
        &mut self,
        scene: &Scene,
        canvas_width: u32,
        naming_seed: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf> {
        let img = self.rasterize(scene, canvas_width);
        let (bytes, suffix) = shrink_to_budget(&self.codec, img, self.byte_budget)?;

        fs::create_dir_all(dest_dir)?;
        let name = output_file_name(naming_seed, &timestamp_now(), &suffix, self.codec.extension());
        let path = dest_dir.join(name);
        fs::write(&path, &bytes)?;
        debug!("wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Draw `scene` at the supersampled size and downsample it to logical
    /// pixels.
    pub fn rasterize(&mut self, scene: &Scene, canvas_width: u32) -> RgbImage {
        let width = canvas_width.max(scene.width).max(1);
        let height = scene.height.max(MIN_HEIGHT);
        let s = self.scale;
        let (sw, sh) = ((width as f64 * s) as u32, (height as f64 * s) as u32);

        let mut ren = RendererBase::new(sw, sh, scene.background);
        draw_background(&mut ren, scene.background_style, &scene.extra_config, s);
        for line in &scene.lines {
            self.draw_line(&mut ren, line);
        }
        let vertical = scene.extra_config.layout_mode == LayoutMode::Vertical;
        for text in &scene.texts {
            self.draw_text(&mut ren, text, vertical);
        }

        if s == 1.0 {
            return ren.into_image();
        }
        imageops::resize(ren.image(), width, height, FilterType::Lanczos3)
    }

    fn draw_line(&self, ren: &mut RendererBase, line: &LineItem) {
        let s = self.scale;
        let p1 = PointD::new(line.x1, line.y1) * s;
        let p2 = PointD::new(line.x2, line.y2) * s;
        let width = (line.width * s).floor().max(1.0);

        let mut path = PathStorage::new();
        for op in style_ops(line.style, p1, p2, width, line.color) {
            op.add_outline(&mut path, 1.0);
        }
        if path.is_empty() {
            return;
        }
        let mut ras = RasterizerScanlineAa::new();
        ras.add_path(&mut path, 0);
        render_scanlines_aa_solid(&mut ras, ren, &line.color);
    }

    fn draw_text(&mut self, ren: &mut RendererBase, text: &TextItem, vertical: bool) {
        let s = self.scale;
        let size = (text.size * s).floor().max(1.0);
        let font = self.fonts.resolve(text.font_style, size);
        let (x, y) = ((text.x * s).floor(), (text.y * s).floor());
        let spacing = (text.spacing * s).floor();
        if vertical {
            draw_text_vertical(ren, &font, &text.content, x, y, spacing, &text.color);
        } else {
            draw_text_horizontal(ren, &font, &text.content, x, y, spacing, &text.color);
        }
    }
}

// ============================================================================
// Shrink policy
// ============================================================================

/// Encode `img` within `budget` bytes if possible.
///
/// Order: full color, then attempts `0..SHRINK_ATTEMPTS` with a palette of
/// `max(32, 256 / (n + 1))` colors, the image shrinking by 10% after each
/// failed attempt. If nothing fits, the last shrunk image is encoded in
/// full color as the final fallback. Returns the bytes and the file-name
/// suffix of the accepted encoding.
pub fn shrink_to_budget<C: ImageCodec + ?Sized>(
    codec: &C,
    img: RgbImage,
    budget: usize,
) -> Result<(Vec<u8>, String)> {
    let bytes = codec.encode(&img, None)?;
    if bytes.len() <= budget {
        return Ok((bytes, String::new()));
    }
    info!("encoded {} bytes, over the {budget} byte budget; shrinking", bytes.len());

    let mut current = img;
    for attempt in 0..SHRINK_ATTEMPTS {
        let colors = (256 / (attempt + 1)).max(MIN_PALETTE);
        let bytes = codec.encode(&current, Some(colors))?;
        info!(
            "shrink attempt {attempt}: {}x{} with {colors} colors, {} bytes",
            current.width(),
            current.height(),
            bytes.len()
        );
        if bytes.len() <= budget {
            return Ok((bytes, format!("_opt{attempt}")));
        }
        let w = ((current.width() as f64 * SHRINK_FACTOR) as u32).max(1);
        let h = ((current.height() as f64 * SHRINK_FACTOR) as u32).max(1);
        current = imageops::resize(&current, w, h, FilterType::Lanczos3);
    }

    let bytes = codec.encode(&current, None)?;
    info!("budget not met; keeping {} byte final fallback", bytes.len());
    Ok((bytes, "_final".to_string()))
}

// ============================================================================
// Tests
// ============================================================================
