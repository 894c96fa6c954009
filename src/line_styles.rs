//! Procedural connector styles.
//!
//! Each style is a pure function `(p1, p2, width, color) -> Vec<DrawOp>`;
//! `style_ops` dispatches on the `LineStyle` tag. Coordinates and widths
//! are in canvas pixels (already supersampled).

use crate::arc::Arc;
use crate::basics::{PointD, PI};
use crate::color::Rgba8;
use crate::config::LineStyle;
use crate::ellipse::Ellipse;
use crate::path_storage::PathStorage;
use crate::stroke::{LineJoin, Stroke};

/// Wave sample spacing along the segment.
const WAVE_STEP: f64 = 2.0;
const WAVE_FREQUENCY: f64 = 0.3;

/// Primitive geometry produced by a line style.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Segment { p1: PointD, p2: PointD, width: f64 },
    Polyline { points: Vec<PointD>, width: f64 },
    Dot { center: PointD, radius: f64 },
    /// Stroked circular arc; angles in radians, increasing clockwise on a
    /// y-down canvas.
    Arc {
        center: PointD,
        radius: f64,
        start: f64,
        end: f64,
        width: f64,
    },
}

/// A shape with the color to fill it.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOp {
    pub shape: Shape,
    pub color: Rgba8,
}

impl DrawOp {
    fn new(shape: Shape, color: Rgba8) -> Self {
        Self { shape, color }
    }

    /// Append the fillable outline of the shape to `path`.
    pub fn add_outline(&self, path: &mut PathStorage, approx_scale: f64) {
        match &self.shape {
            Shape::Segment { p1, p2, width } => {
                Stroke::new(*width).add_line(path, *p1, *p2);
            }
            Shape::Polyline { points, width } => {
                Stroke::new(*width)
                    .line_join(LineJoin::Round)
                    .approximation_scale(approx_scale)
                    .add_polyline(path, points);
            }
            Shape::Dot { center, radius } => {
                let mut e = Ellipse::circle(*center, *radius);
                e.set_approximation_scale(approx_scale);
                path.add_polygon(&e.points());
            }
            Shape::Arc {
                center,
                radius,
                start,
                end,
                width,
            } => {
                let mut arc = Arc::new(center.x, center.y, *radius, *radius, *start, *end, true);
                arc.set_approximation_scale(approx_scale);
                Stroke::new(*width).add_polyline(path, &arc.points());
            }
        }
    }
}

/// Draw ops for a connector from `p1` to `p2` in the given style.
pub fn style_ops(style: LineStyle, p1: PointD, p2: PointD, width: f64, color: Rgba8) -> Vec<DrawOp> {
    match style {
        LineStyle::Solid => solid(p1, p2, width, color),
        LineStyle::Dotted => dotted(p1, p2, width, color),
        LineStyle::Dashed => dashed(p1, p2, width, color),
        LineStyle::Wave => wave(p1, p2, width, color),
        LineStyle::Cloud => cloud(p1, p2, width, color),
    }
}

pub fn solid(p1: PointD, p2: PointD, width: f64, color: Rgba8) -> Vec<DrawOp> {
    vec![DrawOp::new(Shape::Segment { p1, p2, width }, color)]
}

/// Dots every `3 × width`, both endpoints included, radius `width / 2`.
pub fn dotted(p1: PointD, p2: PointD, width: f64, color: Rgba8) -> Vec<DrawOp> {
    let length = p1.distance(p2);
    if length == 0.0 || width <= 0.0 {
        return Vec::new();
    }
    let steps = (length / (width * 3.0)) as usize;
    (0..=steps)
        .map(|i| {
            let t = if steps > 0 { i as f64 / steps as f64 } else { 0.0 };
            let shape = Shape::Dot {
                center: p1.lerp(p2, t),
                radius: width / 2.0,
            };
            DrawOp::new(shape, color)
        })
        .collect()
}

/// Dashes of `4 × width` separated by `2 × width` gaps; the last dash is
/// cut at `p2`.
pub fn dashed(p1: PointD, p2: PointD, width: f64, color: Rgba8) -> Vec<DrawOp> {
    let length = p1.distance(p2);
    if length == 0.0 || width <= 0.0 {
        return Vec::new();
    }
    let dash_len = width * 4.0;
    let cycle = dash_len + width * 2.0;
    let mut ops = Vec::new();
    let mut current = 0.0;
    while current < length {
        let t1 = current / length;
        let t2 = (current + dash_len).min(length) / length;
        let shape = Shape::Segment {
            p1: p1.lerp(p2, t1),
            p2: p1.lerp(p2, t2),
            width,
        };
        ops.push(DrawOp::new(shape, color));
        current += cycle;
    }
    ops
}

/// Sine wave sampled every 2 px, amplitude `2 × width`, offset
/// perpendicular to the segment.
pub fn wave(p1: PointD, p2: PointD, width: f64, color: Rgba8) -> Vec<DrawOp> {
    let d = p2 - p1;
    let length = p1.distance(p2);
    let angle = d.y.atan2(d.x);
    let (sin, cos) = angle.sin_cos();
    let amplitude = width * 2.0;
    let steps = (length / WAVE_STEP) as usize;

    let points: Vec<PointD> = (0..steps)
        .map(|i| {
            let dist = i as f64 * WAVE_STEP;
            let offset = (dist * WAVE_FREQUENCY).sin() * amplitude;
            PointD::new(
                p1.x + cos * dist - sin * offset,
                p1.y + sin * dist + cos * offset,
            )
        })
        .collect();
    if points.len() < 2 {
        return Vec::new();
    }
    vec![DrawOp::new(Shape::Polyline { points, width }, color)]
}

/// Half-turn bumps of radius `4 × width` every `1.5 ×` radius, bulging to
/// the left of the travel direction.
pub fn cloud(p1: PointD, p2: PointD, width: f64, color: Rgba8) -> Vec<DrawOp> {
    let d = p2 - p1;
    let length = p1.distance(p2);
    if length == 0.0 || width <= 0.0 {
        return Vec::new();
    }
    let angle = d.y.atan2(d.x);
    let (sin, cos) = angle.sin_cos();
    let radius = width * 4.0;
    let step = radius * 1.5;
    let offset = PointD::new(-sin, cos) * (radius * 0.2);

    let mut ops = Vec::new();
    let mut t = 0.0;
    while t < length {
        let along = t + radius / 2.0;
        let center = PointD::new(p1.x + cos * along, p1.y + sin * along) + offset;
        let shape = Shape::Arc {
            center,
            radius,
            start: angle + PI,
            end: angle + 2.0 * PI,
            width,
        };
        ops.push(DrawOp::new(shape, color));
        t += step;
    }
    ops
}

// ============================================================================
// Tests
// ============================================================================
