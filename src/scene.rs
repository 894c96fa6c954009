//! Renderer-ready geometry: positioned text and line primitives.

use crate::color::Rgba8;
use crate::config::{BackgroundStyle, LineStyle, Theme};

/// Font family class requested for a text item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Serif,
    Sans,
    Mono,
}

/// A text primitive anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: Rgba8,
    pub font_style: FontStyle,
    /// Extra advance inserted between characters.
    pub spacing: f64,
}

/// A straight connector between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub width: f64,
    pub color: Rgba8,
    pub style: LineStyle,
}

/// The fully resolved diagram: canvas size plus every primitive in paint
/// order. Coordinates are logical (unscaled) units.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Rgba8,
    pub background_style: BackgroundStyle,
    /// Style options the renderer needs beyond the primitives themselves
    /// (decoration colors, layout mode).
    pub extra_config: Theme,
    pub texts: Vec<TextItem>,
    pub lines: Vec<LineItem>,
}

impl Scene {
    /// Empty scene styled by `theme`.
    pub fn new(width: u32, height: u32, theme: &Theme) -> Self {
        Self {
            width,
            height,
            background: theme.background,
            background_style: theme.background_style,
            extra_config: theme.clone(),
            texts: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Every coordinate the scene references, texts first, in emission
    /// order.
    pub fn coordinates(&self) -> Vec<(f64, f64)> {
        let texts = self.texts.iter().map(|t| (t.x, t.y));
        let lines = self
            .lines
            .iter()
            .flat_map(|l| [(l.x1, l.y1), (l.x2, l.y2)]);
        texts.chain(lines).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_scene_takes_theme_background() {
        let theme = Theme::preset("tech", 24);
        let scene = Scene::new(100, 50, &theme);
        assert_eq!(scene.background, theme.background);
        assert_eq!(scene.background_style, BackgroundStyle::Dots);
        assert!(scene.texts.is_empty() && scene.lines.is_empty());
    }

    #[test]
    fn test_coordinates_order() {
        let theme = Theme::default();
        let mut scene = Scene::new(100, 100, &theme);
        scene.lines.push(LineItem {
            x1: 1.0,
            y1: 2.0,
            x2: 3.0,
            y2: 4.0,
            width: 2.0,
            color: theme.line,
            style: LineStyle::Solid,
        });
        scene.texts.push(TextItem {
            content: "a".into(),
            x: 5.0,
            y: 6.0,
            size: 24.0,
            color: theme.text,
            font_style: FontStyle::Sans,
            spacing: 0.0,
        });
        assert_eq!(scene.coordinates(), [(5.0, 6.0), (1.0, 2.0), (3.0, 4.0)]);
    }
}
