//! # asciitree-png
//!
//! Turns ASCII trees (`├──`, `└──`, `│`) and indented outlines into
//! anti-aliased PNG diagrams.
//!
//! ## Pipeline
//!
//! 1. **Parse** ([`parser`]): text → [`Node`] tree, tolerant of irregular
//!    indentation.
//! 2. **Layout** ([`layout`](mod@layout)): tree → [`Scene`] of positioned text and
//!    connector lines, as a top-down list or right-to-left columns.
//! 3. **Render** ([`render`]): scene → supersampled canvas → downsampled
//!    image → PNG under a byte budget.
//!
//! Rendering is a small scanline pipeline: vertex sources (paths,
//! ellipses, arcs, strokes, glyph outlines) feed an area-coverage
//! rasterizer, which blends solid spans into an RGB canvas.
//!
//! ```no_run
//! use asciitree_png::{convert, ConvertOptions};
//!
//! let path = convert("project\n  src\n    main.rs\n  README.md", &ConvertOptions::default())?;
//! println!("{}", path.display());
//! # Ok::<(), asciitree_png::Error>(())
//! ```

// Model and configuration
pub mod basics;
pub mod color;
pub mod config;
pub mod error;
pub mod scene;

// Parse and layout
pub mod layout;
pub mod parser;

// Geometry
pub mod arc;
pub mod ellipse;
pub mod line_styles;
pub mod path_storage;
pub mod stroke;

// Rasterization
pub mod background;
pub mod rasterizer_scanline_aa;
pub mod renderer_base;

// Text
pub mod font_cache;
#[cfg(feature = "font")]
pub mod font_engine;
pub mod glyph_raster_bin;
pub mod renderer_text;

// Output
pub mod codec;
pub mod naming;
pub mod render;

use std::path::PathBuf;

pub use crate::codec::{ImageCodec, PngCodec};
pub use crate::color::Rgba8;
pub use crate::config::{BackgroundStyle, LayoutMode, LineStyle, Theme};
pub use crate::error::{Error, Result};
pub use crate::font_cache::FontSource;
pub use crate::layout::layout;
pub use crate::parser::{parse, Node};
pub use crate::render::Renderer;
pub use crate::scene::{FontStyle, LineItem, Scene, TextItem};

/// Options for [`convert`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Logical canvas width.
    pub width: u32,
    pub font_size: u32,
    /// Preset name, see [`Theme::preset`].
    pub theme: String,
    /// Replaces the preset entirely; its font size is overridden by
    /// `font_size`.
    pub custom_colors: Option<Theme>,
    pub layout_mode: Option<LayoutMode>,
    pub line_style: Option<LineStyle>,
    pub output_dir: PathBuf,
    pub font: FontSource,
    /// Naming seed for the output file; defaults to the input text.
    pub filename_hint: Option<String>,
    pub byte_budget: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            width: 1080,
            font_size: 24,
            theme: "minimal".to_string(),
            custom_colors: None,
            layout_mode: None,
            line_style: None,
            output_dir: PathBuf::from("output"),
            font: FontSource::System,
            filename_hint: None,
            byte_budget: render::DEFAULT_BYTE_BUDGET,
        }
    }
}

impl ConvertOptions {
    /// The effective theme: custom colors or the named preset, with the
    /// layout and line style overrides applied.
    pub fn resolved_theme(&self) -> Theme {
        let mut theme = match &self.custom_colors {
            Some(custom) => Theme {
                font_size: self.font_size,
                ..custom.clone()
            },
            None => Theme::preset(&self.theme, self.font_size),
        };
        if let Some(mode) = self.layout_mode {
            theme.layout_mode = mode;
        }
        if let Some(style) = self.line_style {
            theme.line_style = style;
        }
        theme
    }

    /// Parse and lay out `text` at the resolved theme's font size.
    pub fn scene(&self, text: &str) -> Result<Scene> {
        let root = parse(text)?;
        let theme = self.resolved_theme();
        Ok(layout(&root, self.width, theme.font_size, &theme))
    }
}

/// Parse, lay out and render `text` in one call. Returns the path of the
/// written image.
pub fn convert(text: &str, options: &ConvertOptions) -> Result<PathBuf> {
    let scene = options.scene(text)?;
    let seed = options.filename_hint.as_deref().unwrap_or(text);
    Renderer::new(options.font.clone())
        .byte_budget(options.byte_budget)
        .render(&scene, options.width, seed, &options.output_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(dir: &std::path::Path) -> ConvertOptions {
        ConvertOptions {
            width: 300,
            font_size: 16,
            output_dir: dir.to_path_buf(),
            font: FontSource::Builtin,
            ..ConvertOptions::default()
        }
    }

    #[test]
    fn test_resolved_theme_overrides() {
        let opts = ConvertOptions {
            theme: "tech".into(),
            layout_mode: Some(LayoutMode::Vertical),
            line_style: Some(LineStyle::Wave),
            ..ConvertOptions::default()
        };
        let theme = opts.resolved_theme();
        assert_eq!(theme.background_style, BackgroundStyle::Dots);
        assert_eq!(theme.layout_mode, LayoutMode::Vertical);
        assert_eq!(theme.line_style, LineStyle::Wave);
        assert_eq!(theme.font_size, 24);

        let custom = Theme {
            font_size: 99,
            background: Rgba8::rgb(1, 2, 3),
            ..Theme::default()
        };
        let opts = ConvertOptions {
            custom_colors: Some(custom),
            font_size: 30,
            ..ConvertOptions::default()
        };
        let theme = opts.resolved_theme();
        assert_eq!(theme.background, Rgba8::rgb(1, 2, 3));
        assert_eq!(theme.font_size, 30);
    }

    #[test]
    fn test_scene_uses_theme_font_size() {
        let opts = ConvertOptions {
            font_size: 30,
            custom_colors: Some(Theme {
                font_size: 12,
                ..Theme::default()
            }),
            ..ConvertOptions::default()
        };
        let scene = opts.scene("root\n  a").unwrap();
        assert_eq!(scene.texts.len(), 2);
        assert_eq!(scene.texts[1].content, "a");
        assert_eq!(scene.texts[1].size, 30.0);
        assert!(matches!(opts.scene(""), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_convert_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let text = "project/\n├── src/\n│   └── main.rs\n└── Cargo.toml\n";
        let path = convert(text, &options(dir.path())).unwrap();
        assert!(path.exists());
        assert!(path.file_name().unwrap().to_string_lossy().contains("_project_"));
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (300, 400));
    }

    #[test]
    fn test_convert_filename_hint() {
        let dir = tempfile::tempdir().unwrap();
        let opts = ConvertOptions {
            filename_hint: Some("custom name".into()),
            ..options(dir.path())
        };
        let path = convert("root\n  a", &opts).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().contains("_customname_"));
    }

    #[test]
    fn test_convert_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert(" \n\n", &options(dir.path())).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
