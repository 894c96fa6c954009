//! TrueType font engine using `ttf-parser`.
//!
//! Extracts glyph outlines straight into a `PathStorage`, scaled to the
//! requested pixel height and flipped into the y-down canvas frame.

use std::sync::Arc;

use ttf_parser::{Face, FaceParsingError, OutlineBuilder};

use crate::path_storage::PathStorage;

/// TrueType/OpenType face at a fixed pixel height. Clones share the face
/// bytes.
#[derive(Debug, Clone)]
pub struct FontEngine {
    face_data: Arc<[u8]>,
    face_index: u32,
    height: f64,
}

impl FontEngine {
    /// Validate and take ownership of raw font bytes. `face_index` selects
    /// the face in a collection (`.ttc`); use 0 for single fonts.
    pub fn from_data(data: Vec<u8>, face_index: u32) -> Result<Self, FaceParsingError> {
        Face::parse(&data, face_index)?;
        Ok(Self {
            face_data: data.into(),
            face_index,
            height: 12.0,
        })
    }

    /// Em-height in pixels.
    pub fn with_height(mut self, h: f64) -> Self {
        self.height = h;
        self
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Distance from the top of the line to the baseline.
    pub fn ascender(&self) -> f64 {
        self.face()
            .map_or(self.height, |face| face.ascender() as f64 * self.scale(&face))
    }

    /// Horizontal advance of `ch`, `None` when the face lacks it.
    pub fn advance(&self, ch: char) -> Option<f64> {
        let face = self.face()?;
        let id = face.glyph_index(ch)?;
        let adv = face.glyph_hor_advance(id)?;
        Some(adv as f64 * self.scale(&face))
    }

    /// Advance used for characters the face lacks.
    pub fn fallback_advance(&self) -> f64 {
        ['0', 'n', 'x']
            .into_iter()
            .find_map(|ch| self.advance(ch))
            .unwrap_or(self.height * 0.5)
    }

    /// Append the outline of `ch` with its origin at `(x, baseline)`.
    /// Returns false when the face has no glyph for `ch`.
    pub fn add_glyph(&self, ch: char, x: f64, baseline: f64, path: &mut PathStorage) -> bool {
        let Some(face) = self.face() else {
            return false;
        };
        let Some(id) = face.glyph_index(ch) else {
            return false;
        };
        let mut builder = OutlineCollector {
            path,
            scale: self.scale(&face),
            x,
            y: baseline,
        };
        // Glyphs without an outline (space) are still present.
        face.outline_glyph(id, &mut builder);
        builder.path.close_polygon();
        true
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.face_data, self.face_index).ok()
    }

    fn scale(&self, face: &Face<'_>) -> f64 {
        self.height / face.units_per_em().max(1) as f64
    }
}

// ============================================================================
// OutlineCollector
// ============================================================================

/// Feeds font-unit outline commands into a path, scaled and y-flipped
/// around the glyph origin.
struct OutlineCollector<'a> {
    path: &'a mut PathStorage,
    scale: f64,
    x: f64,
    y: f64,
}

impl OutlineCollector<'_> {
    #[inline]
    fn sx(&self, v: f32) -> f64 {
        self.x + v as f64 * self.scale
    }

    #[inline]
    fn sy(&self, v: f32) -> f64 {
        self.y - v as f64 * self.scale
    }
}

impl OutlineBuilder for OutlineCollector<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.close_polygon();
        let (x, y) = (self.sx(x), self.sy(y));
        self.path.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.sx(x), self.sy(y));
        self.path.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1, x, y) = (self.sx(x1), self.sy(y1), self.sx(x), self.sy(y));
        self.path.curve3(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = (self.sx(x1), self.sy(y1));
        let (x2, y2) = (self.sx(x2), self.sy(y2));
        let (x, y) = (self.sx(x), self.sy(y));
        self.path.curve4(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.path.close_polygon();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::{is_end_poly, is_stop, VertexSource, PATH_CMD_LINE_TO, PATH_CMD_MOVE_TO};

    fn collector(path: &mut PathStorage) -> OutlineCollector<'_> {
        OutlineCollector {
            path,
            scale: 0.5,
            x: 100.0,
            y: 50.0,
        }
    }

    #[test]
    fn test_from_data_rejects_garbage() {
        assert!(FontEngine::from_data(vec![0, 1, 2, 3], 0).is_err());
        assert!(FontEngine::from_data(Vec::new(), 0).is_err());
    }

    #[test]
    fn test_outline_collector_transform() {
        let mut path = PathStorage::new();
        let c = collector(&mut path);
        assert_eq!(c.sx(10.0), 105.0);
        // Font units grow upward, canvas rows grow downward.
        assert_eq!(c.sy(10.0), 45.0);
        assert_eq!(c.sy(-10.0), 55.0);
    }

    #[test]
    fn test_outline_collector_commands() {
        let mut path = PathStorage::new();
        {
            let mut c = collector(&mut path);
            c.move_to(0.0, 0.0);
            c.line_to(20.0, 0.0);
            c.quad_to(20.0, 20.0, 0.0, 20.0);
            c.close();
            c.move_to(40.0, 0.0);
            c.curve_to(40.0, 10.0, 50.0, 10.0, 50.0, 0.0);
            c.close();
        }
        let mut cmds = Vec::new();
        let (mut x, mut y) = (0.0, 0.0);
        path.rewind(0);
        loop {
            let cmd = path.vertex(&mut x, &mut y);
            if is_stop(cmd) {
                break;
            }
            cmds.push((x, y, cmd));
        }
        assert_eq!(cmds[0], (100.0, 50.0, PATH_CMD_MOVE_TO));
        assert_eq!(cmds[1], (110.0, 50.0, PATH_CMD_LINE_TO));
        let polys = cmds.iter().filter(|c| is_end_poly(c.2)).count();
        assert_eq!(polys, 2);
        assert_eq!(path.polygon_areas().len(), 2);
    }
}
