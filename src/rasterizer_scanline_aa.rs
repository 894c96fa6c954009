//! Anti-aliased polygon rasterizer.
//!
//! Accepts polygon contours (move_to/line_to/close), then sweeps them into
//! per-pixel coverage rows. Coverage is exact signed area accumulated into
//! a dense cell grid spanning the contours' bounding box, intersected with
//! the renderer's clip box. Contours close automatically.
//!
//! The fill rule is nonzero: accumulated winding area is taken in absolute
//! value and clamped, so overlapping contours of the same orientation merge
//! while opposite ones cut holes.

use crate::basics::{
    is_end_poly, is_move_to, is_stop, is_vertex, CoverType, PointD, RectI, VertexSource,
    COVER_FULL,
};
use crate::color::Rgba8;
use crate::renderer_base::RendererBase;

/// Edges shorter than this in y carry no area.
const EDGE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
struct Edge {
    p0: PointD,
    p1: PointD,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Initial,
    MoveTo,
    LineTo,
}

/// Polygon rasterizer with exact-area anti-aliasing.
#[derive(Debug, Clone)]
pub struct RasterizerScanlineAa {
    edges: Vec<Edge>,
    start: PointD,
    cur: PointD,
    status: Status,
}

impl Default for RasterizerScanlineAa {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterizerScanlineAa {
    pub fn new() -> Self {
        Self {
            edges: Vec::new(),
            start: PointD::default(),
            cur: PointD::default(),
            status: Status::Initial,
        }
    }

    /// Drop all contours.
    pub fn reset(&mut self) {
        self.edges.clear();
        self.status = Status::Initial;
    }

    // ========================================================================
    // Path building
    // ========================================================================

    pub fn close_polygon(&mut self) {
        if self.status == Status::LineTo {
            self.push_edge(self.cur, self.start);
        }
        self.status = Status::Initial;
    }

    pub fn move_to_d(&mut self, x: f64, y: f64) {
        self.close_polygon();
        self.start = PointD::new(x, y);
        self.cur = self.start;
        self.status = Status::MoveTo;
    }

    pub fn line_to_d(&mut self, x: f64, y: f64) {
        let p = PointD::new(x, y);
        if self.status == Status::Initial {
            self.move_to_d(x, y);
            return;
        }
        self.push_edge(self.cur, p);
        self.cur = p;
        self.status = Status::LineTo;
    }

    /// Dispatch on a path command.
    pub fn add_vertex(&mut self, x: f64, y: f64, cmd: u32) {
        if is_move_to(cmd) {
            self.move_to_d(x, y);
        } else if is_vertex(cmd) {
            self.line_to_d(x, y);
        } else if is_end_poly(cmd) {
            self.close_polygon();
        }
    }

    pub fn add_path(&mut self, vs: &mut dyn VertexSource, path_id: u32) {
        let (mut x, mut y) = (0.0, 0.0);
        vs.rewind(path_id);
        loop {
            let cmd = vs.vertex(&mut x, &mut y);
            if is_stop(cmd) {
                break;
            }
            self.add_vertex(x, y, cmd);
        }
        self.close_polygon();
    }

    fn push_edge(&mut self, p0: PointD, p1: PointD) {
        if p0.x.is_finite() && p0.y.is_finite() && p1.x.is_finite() && p1.y.is_finite() {
            self.edges.push(Edge { p0, p1 });
        }
    }

    // ========================================================================
    // Bounding box
    // ========================================================================

    /// Integer pixel box touched by the edges, `x2`/`y2` exclusive.
    pub fn bounding_box(&self) -> Option<RectI> {
        let first = self.edges.first()?;
        let (mut x1, mut y1, mut x2, mut y2) = (first.p0.x, first.p0.y, first.p0.x, first.p0.y);
        for e in &self.edges {
            for p in [e.p0, e.p1] {
                x1 = x1.min(p.x);
                y1 = y1.min(p.y);
                x2 = x2.max(p.x);
                y2 = y2.max(p.y);
            }
        }
        Some(RectI::new(
            x1.floor() as i32,
            y1.floor() as i32,
            x2.ceil() as i32,
            y2.ceil() as i32,
        ))
    }

    // ========================================================================
    // Sweep
    // ========================================================================

    /// Convert accumulated winding area to 8-bit coverage.
    pub fn calculate_alpha(&self, area: f32) -> CoverType {
        let cover = area.abs().min(1.0) as f64;
        (cover * COVER_FULL as f64 + 0.5) as CoverType
    }

    /// Sweep every scanline inside `clip` (inclusive box), calling `f` with
    /// the row's start x, y and per-pixel coverage.
    pub fn sweep_scanlines<F>(&self, clip: &RectI, mut f: F)
    where
        F: FnMut(i32, i32, &[CoverType]),
    {
        let Some(bbox) = self.bounding_box() else {
            return;
        };
        let mut area = RectI::new(bbox.x1, bbox.y1, bbox.x2 - 1, bbox.y2 - 1);
        if !area.clip(clip) {
            return;
        }
        let (bx, by) = (area.x1, area.y1);
        let width = (area.x2 - bx + 1) as usize;
        let height = (area.y2 - by + 1) as usize;

        let mut cells = CellGrid::new(width, height);
        let origin = PointD::new(bx as f64, by as f64);
        for e in &self.edges {
            cells.add_clipped_line(e.p0 - origin, e.p1 - origin);
        }

        let mut covers = vec![0 as CoverType; width];
        for row in 0..height {
            let line = &cells.acc[row * cells.stride..(row + 1) * cells.stride];
            let mut sum = 0.0f32;
            let mut any = false;
            for (cover, &a) in covers.iter_mut().zip(line) {
                sum += a;
                *cover = self.calculate_alpha(sum);
                any |= *cover != 0;
            }
            if any {
                f(bx, by + row as i32, &covers);
            }
        }
    }
}

// ============================================================================
// Cell grid
// ============================================================================

/// Dense signed-area accumulation buffer. Each row carries two guard cells
/// so that edges touching the right border stay in bounds.
struct CellGrid {
    acc: Vec<f32>,
    stride: usize,
    width: f64,
    height: usize,
}

impl CellGrid {
    fn new(width: usize, height: usize) -> Self {
        let stride = width + 2;
        Self {
            acc: vec![0.0; stride * height],
            stride,
            width: width as f64,
            height,
        }
    }

    /// Split a line where it crosses x = 0 and x = width; pieces outside
    /// are projected onto the border so their winding still counts.
    fn add_clipped_line(&mut self, p0: PointD, p1: PointD) {
        let mut ts = [0.0, 1.0, 1.0, 1.0];
        let mut n = 1;
        let dx = p1.x - p0.x;
        if dx != 0.0 {
            for bound in [0.0, self.width] {
                let t = (bound - p0.x) / dx;
                if t > 0.0 && t < 1.0 {
                    ts[n] = t;
                    n += 1;
                }
            }
        }
        ts[n] = 1.0;
        ts[1..n].sort_by(f64::total_cmp);

        let width = self.width;
        let clamp = |p: PointD| PointD::new(p.x.clamp(0.0, width), p.y);
        for w in ts[..=n].windows(2) {
            let a = clamp(p0.lerp(p1, w[0]));
            let b = clamp(p0.lerp(p1, w[1]));
            self.add_line(a, b);
        }
    }

    /// Accumulate the signed area of one line; x must lie in [0, width].
    fn add_line(&mut self, p0: PointD, p1: PointD) {
        if (p0.y - p1.y).abs() <= EDGE_EPSILON {
            return;
        }
        let (dir, p0, p1) = if p0.y < p1.y {
            (1.0, p0, p1)
        } else {
            (-1.0, p1, p0)
        };
        let dxdy = (p1.x - p0.x) / (p1.y - p0.y);
        let mut x = p0.x;
        if p0.y < 0.0 {
            x -= p0.y * dxdy;
        }
        let y_start = p0.y.max(0.0) as usize;
        let y_end = (p1.y.ceil().max(0.0) as usize).min(self.height);

        for y in y_start..y_end {
            let row = y * self.stride;
            let dy = ((y + 1) as f64).min(p1.y) - (y as f64).max(p0.y);
            let xcur = x.clamp(0.0, self.width);
            let xnext = (x + dxdy * dy).clamp(0.0, self.width);
            x += dxdy * dy;
            let d = (dy * dir) as f32;

            let (x0, x1) = if xcur < xnext { (xcur, xnext) } else { (xnext, xcur) };
            let x0floor = x0.floor();
            let x0i = x0floor as usize;
            let x1ceil = x1.ceil();
            let x1i = x1ceil as usize;

            if x1i <= x0i + 1 {
                // Both ends inside one cell.
                let xmf = (0.5 * (xcur + xnext) - x0floor) as f32;
                self.acc[row + x0i] += d - d * xmf;
                self.acc[row + x0i + 1] += d * xmf;
            } else {
                let s = (x1 - x0).recip();
                let x0f = x0 - x0floor;
                let a0 = 0.5 * s * (1.0 - x0f) * (1.0 - x0f);
                let x1f = x1 - x1ceil + 1.0;
                let am = 0.5 * s * x1f * x1f;
                self.acc[row + x0i] += d * a0 as f32;
                if x1i == x0i + 2 {
                    self.acc[row + x0i + 1] += d * (1.0 - a0 - am) as f32;
                } else {
                    let a1 = s * (1.5 - x0f);
                    self.acc[row + x0i + 1] += d * (a1 - a0) as f32;
                    for xi in x0i + 2..x1i - 1 {
                        self.acc[row + xi] += d * s as f32;
                    }
                    let a2 = a1 + (x1i - x0i - 3) as f64 * s;
                    self.acc[row + x1i - 1] += d * (1.0 - a2 - am) as f32;
                }
                self.acc[row + x1i] += d * am as f32;
            }
        }
    }
}

// ============================================================================
// Solid rendering
// ============================================================================

/// Sweep `ras` into `ren` with a solid color, then reset the rasterizer.
pub fn render_scanlines_aa_solid(
    ras: &mut RasterizerScanlineAa,
    ren: &mut RendererBase,
    color: &Rgba8,
) {
    let clip = *ren.clip_box();
    ras.sweep_scanlines(&clip, |x, y, covers| {
        ren.blend_solid_hspan(x, y, color, covers);
    });
    ras.reset();
}

// ============================================================================
// Tests
// ============================================================================
