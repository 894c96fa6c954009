//! Style configuration consumed by the layout engine and the renderer.
//!
//! `Theme` replaces a loose key→value style dictionary with typed fields.
//! Enumerated options parse leniently so a stale or misspelled value
//! degrades to the default instead of failing a conversion.

use serde::Deserialize;
use serde_json::Value;

use crate::color::Rgba8;
use crate::error::{Error, Result};

// ============================================================================
// Enumerated options
// ============================================================================

/// Layout algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum LayoutMode {
    /// Top-down list, one row per node.
    #[default]
    Horizontal,
    /// Right-to-left columns with vertically stacked glyphs.
    Vertical,
}

impl From<&str> for LayoutMode {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "vertical" => LayoutMode::Vertical,
            _ => LayoutMode::Horizontal,
        }
    }
}

impl From<String> for LayoutMode {
    fn from(name: String) -> Self {
        LayoutMode::from(name.as_str())
    }
}

/// Connector stroke style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum LineStyle {
    #[default]
    Solid,
    Dotted,
    Dashed,
    Wave,
    Cloud,
}

impl From<&str> for LineStyle {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "dotted" => LineStyle::Dotted,
            "dashed" => LineStyle::Dashed,
            "wave" => LineStyle::Wave,
            "cloud" => LineStyle::Cloud,
            _ => LineStyle::Solid,
        }
    }
}

impl From<String> for LineStyle {
    fn from(name: String) -> Self {
        LineStyle::from(name.as_str())
    }
}

/// Background decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum BackgroundStyle {
    #[default]
    Plain,
    Grid,
    Dots,
    Circle,
    Gradient,
}

impl From<&str> for BackgroundStyle {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "grid" => BackgroundStyle::Grid,
            "dots" => BackgroundStyle::Dots,
            "circle" => BackgroundStyle::Circle,
            "gradient" | "gradient_green" => BackgroundStyle::Gradient,
            _ => BackgroundStyle::Plain,
        }
    }
}

impl From<String> for BackgroundStyle {
    fn from(name: String) -> Self {
        BackgroundStyle::from(name.as_str())
    }
}

// ============================================================================
// Theme
// ============================================================================

/// Colors, decoration and layout options for one conversion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Base text size the layout scales from.
    pub font_size: u32,
    #[serde(alias = "bg")]
    pub background: Rgba8,
    pub text: Rgba8,
    pub line: Rgba8,
    #[serde(alias = "bg_style")]
    pub background_style: BackgroundStyle,
    pub grid_color: Rgba8,
    pub dot_color: Rgba8,
    pub circle_colors: Vec<Rgba8>,
    pub circle_opacity: f64,
    pub gradient_top: Rgba8,
    pub gradient_bottom: Rgba8,
    pub layout_mode: LayoutMode,
    pub line_style: LineStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_size: 24,
            background: Rgba8::white(),
            text: Rgba8::rgb(33, 33, 33),
            line: Rgba8::rgb(200, 200, 200),
            background_style: BackgroundStyle::Plain,
            grid_color: Rgba8::rgb(220, 220, 220),
            dot_color: Rgba8::rgb(200, 200, 200),
            circle_colors: vec![Rgba8::rgb(240, 240, 240)],
            circle_opacity: 0.6,
            gradient_top: Rgba8::rgb(240, 253, 244),
            gradient_bottom: Rgba8::rgb(220, 252, 231),
            layout_mode: LayoutMode::Horizontal,
            line_style: LineStyle::Solid,
        }
    }
}

impl Theme {
    /// Look up a preset by name (case-insensitive, Chinese aliases
    /// accepted). Unknown names yield the minimal preset.
    pub fn preset(name: &str, font_size: u32) -> Theme {
        let base = Theme {
            font_size,
            ..Theme::default()
        };
        match name.trim().to_lowercase().as_str() {
            "business" | "商务" => Theme {
                background: Rgba8::rgb(245, 247, 250),
                text: Rgba8::rgb(44, 62, 80),
                line: Rgba8::rgb(189, 195, 199),
                background_style: BackgroundStyle::Grid,
                grid_color: Rgba8::rgb(230, 230, 235),
                ..base
            },
            "art" | "艺术" => Theme {
                background: Rgba8::rgb(253, 250, 245),
                text: Rgba8::rgb(93, 64, 55),
                line: Rgba8::rgb(215, 204, 200),
                background_style: BackgroundStyle::Circle,
                circle_colors: vec![Rgba8::rgb(255, 224, 178), Rgba8::rgb(255, 204, 188)],
                ..base
            },
            "tech" | "科技" => Theme {
                background: Rgba8::rgb(15, 23, 42),
                text: Rgba8::rgb(226, 232, 240),
                line: Rgba8::rgb(51, 65, 85),
                background_style: BackgroundStyle::Dots,
                dot_color: Rgba8::rgb(30, 41, 59),
                ..base
            },
            "nature" | "自然" => Theme {
                background: Rgba8::rgb(240, 253, 244),
                text: Rgba8::rgb(20, 83, 45),
                line: Rgba8::rgb(187, 247, 208),
                background_style: BackgroundStyle::Gradient,
                ..base
            },
            _ => base,
        }
    }

    /// Parse a theme from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// A malformed color under any color key is reported as
    /// [`Error::UnsupportedColorFormat`]; other malformed input as
    /// [`Error::Config`].
    pub fn from_json(json: &str) -> Result<Theme> {
        let doc: Value = serde_json::from_str(json)?;
        if let Some(fields) = doc.as_object() {
            for (key, value) in fields {
                if COLOR_KEYS.contains(&key.as_str()) {
                    check_color(value)?;
                } else if key == "circle_colors" {
                    for color in value.as_array().into_iter().flatten() {
                        check_color(color)?;
                    }
                }
            }
        }
        Ok(serde_json::from_value(doc)?)
    }
}

/// Theme keys, aliases included, that hold a single color.
const COLOR_KEYS: [&str; 8] = [
    "background",
    "bg",
    "text",
    "line",
    "grid_color",
    "dot_color",
    "gradient_top",
    "gradient_bottom",
];

fn check_color(value: &Value) -> Result<()> {
    match value {
        Value::String(s) => Rgba8::parse(s).map(|_| ()),
        Value::Array(items)
            if matches!(items.len(), 3 | 4)
                && items.iter().all(|c| c.as_u64().is_some_and(|c| c <= 255)) =>
        {
            Ok(())
        }
        other => Err(Error::UnsupportedColorFormat(other.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_enums() {
        assert_eq!(LayoutMode::from("vertical"), LayoutMode::Vertical);
        assert_eq!(LayoutMode::from("VERTICAL "), LayoutMode::Vertical);
        assert_eq!(LayoutMode::from("diagonal"), LayoutMode::Horizontal);
        assert_eq!(LineStyle::from("cloud"), LineStyle::Cloud);
        assert_eq!(LineStyle::from("zigzag"), LineStyle::Solid);
        assert_eq!(
            BackgroundStyle::from("gradient_green"),
            BackgroundStyle::Gradient
        );
        assert_eq!(BackgroundStyle::from("stripes"), BackgroundStyle::Plain);
    }

    #[test]
    fn test_presets() {
        let t = Theme::preset("Business", 30);
        assert_eq!(t.font_size, 30);
        assert_eq!(t.background_style, BackgroundStyle::Grid);
        assert_eq!(t.grid_color, Rgba8::rgb(230, 230, 235));

        assert_eq!(
            Theme::preset("艺术", 24).background_style,
            BackgroundStyle::Circle
        );
        assert_eq!(Theme::preset("tech", 24).dot_color, Rgba8::rgb(30, 41, 59));
        assert_eq!(
            Theme::preset("nature", 24).background_style,
            BackgroundStyle::Gradient
        );
        assert_eq!(Theme::preset("wechat", 24), Theme::preset("minimal", 24));
    }

    #[test]
    fn test_from_json_partial() {
        let t = Theme::from_json(
            r##"{"bg": "#FF0000", "text": [0, 255, 0], "line_style": "dashed",
                "layout_mode": "vertical", "bg_style": "dots"}"##,
        )
        .unwrap();
        assert_eq!(t.background, Rgba8::rgb(255, 0, 0));
        assert_eq!(t.text, Rgba8::rgb(0, 255, 0));
        assert_eq!(t.line_style, LineStyle::Dashed);
        assert_eq!(t.layout_mode, LayoutMode::Vertical);
        assert_eq!(t.background_style, BackgroundStyle::Dots);
        assert_eq!(t.font_size, 24);
    }

    #[test]
    fn test_from_json_bad_color() {
        let err = Theme::from_json(r##"{"line": "#12"}"##).unwrap_err();
        assert!(matches!(err, Error::UnsupportedColorFormat(ref s) if s == "#12"));

        let err = Theme::from_json(r##"{"bg": [1, 2]}"##).unwrap_err();
        assert!(matches!(err, Error::UnsupportedColorFormat(ref s) if s == "[1,2]"));

        let err = Theme::from_json(r##"{"circle_colors": ["#fff", "nope"]}"##).unwrap_err();
        assert!(matches!(err, Error::UnsupportedColorFormat(ref s) if s == "nope"));
    }

    #[test]
    fn test_from_json_structural_errors_stay_config() {
        assert!(matches!(Theme::from_json("{"), Err(Error::Config(_))));
        assert!(matches!(
            Theme::from_json(r#"{"circle_opacity": "high"}"#),
            Err(Error::Config(_))
        ));
    }
}
