//! Stroke generation: polylines to fillable polygons.
//!
//! Each segment becomes a quadrilateral; caps and joins are added as
//! separate polygons. All output polygons share one orientation, so the
//! nonzero rasterizer fills their union without seams or cancellation.

use crate::basics::PointD;
use crate::ellipse::Ellipse;
use crate::path_storage::PathStorage;

/// Line cap style for polyline endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Square,
    Round,
}

/// Line join style at interior vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Segments simply overlap; no fill at the outer corner.
    None,
    #[default]
    Bevel,
    Round,
}

/// Stroke parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    width: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    approx_scale: f64,
}

impl Stroke {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Bevel,
            approx_scale: 1.0,
        }
    }

    pub fn line_cap(mut self, cap: LineCap) -> Self {
        self.line_cap = cap;
        self
    }

    pub fn line_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    /// Forwarded to the ellipses of round caps and joins.
    pub fn approximation_scale(mut self, scale: f64) -> Self {
        self.approx_scale = scale;
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Append the outline of `points` stroked as an open polyline.
    ///
    /// Consecutive duplicates are ignored. A single point only produces
    /// output with round or square caps.
    pub fn add_polyline(&self, path: &mut PathStorage, points: &[PointD]) {
        let half = self.width.abs() / 2.0;
        if half == 0.0 {
            return;
        }
        let mut pts: Vec<PointD> = Vec::with_capacity(points.len());
        for &p in points {
            if pts.last().map_or(true, |last| last.distance(p) > 1e-9) {
                pts.push(p);
            }
        }

        let mut out = PathStorage::new();
        match pts.as_slice() {
            [] => return,
            [p] => match self.line_cap {
                LineCap::Butt => return,
                LineCap::Round => self.add_disc(&mut out, *p, half),
                LineCap::Square => out.add_polygon(&[
                    PointD::new(p.x - half, p.y - half),
                    PointD::new(p.x + half, p.y - half),
                    PointD::new(p.x + half, p.y + half),
                    PointD::new(p.x - half, p.y + half),
                ]),
            },
            _ => {
                let last = pts.len() - 1;
                for (i, w) in pts.windows(2).enumerate() {
                    let (mut a, mut b) = (w[0], w[1]);
                    let dir = unit(b - a);
                    if self.line_cap == LineCap::Square {
                        if i == 0 {
                            a = a - dir * half;
                        }
                        if i + 1 == last {
                            b = b + dir * half;
                        }
                    }
                    let n = PointD::new(-dir.y, dir.x) * half;
                    out.add_polygon(&[a + n, b + n, b - n, a - n]);
                }
                for i in 1..last {
                    self.add_join(&mut out, pts[i - 1], pts[i], pts[i + 1], half);
                }
                if self.line_cap == LineCap::Round {
                    self.add_disc(&mut out, pts[0], half);
                    self.add_disc(&mut out, pts[last], half);
                }
            }
        }
        out.arrange_orientations_all_paths(true);
        path.concat_path(&mut out, 0);
    }

    /// Append a single stroked segment.
    pub fn add_line(&self, path: &mut PathStorage, p1: PointD, p2: PointD) {
        self.add_polyline(path, &[p1, p2]);
    }

    fn add_join(&self, out: &mut PathStorage, prev: PointD, v: PointD, next: PointD, half: f64) {
        match self.line_join {
            LineJoin::None => {}
            LineJoin::Round => self.add_disc(out, v, half),
            LineJoin::Bevel => {
                let d1 = unit(v - prev);
                let d2 = unit(next - v);
                let n1 = PointD::new(-d1.y, d1.x) * half;
                let n2 = PointD::new(-d2.y, d2.x) * half;
                // Fill both corner wedges; the inner one is already covered.
                for s in [1.0, -1.0] {
                    let tri = [v, v + n1 * s, v + n2 * s];
                    if cross(tri[1] - v, tri[2] - v).abs() > 1e-12 {
                        out.add_polygon(&tri);
                    }
                }
            }
        }
    }

    fn add_disc(&self, out: &mut PathStorage, center: PointD, r: f64) {
        let mut e = Ellipse::circle(center, r);
        e.set_approximation_scale(self.approx_scale);
        out.add_polygon(&e.points());
    }
}

fn unit(v: PointD) -> PointD {
    let len = v.x.hypot(v.y);
    if len == 0.0 {
        PointD::new(0.0, 0.0)
    } else {
        v * (1.0 / len)
    }
}

fn cross(a: PointD, b: PointD) -> f64 {
    a.x * b.y - a.y * b.x
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_quad() {
        let mut path = PathStorage::new();
        Stroke::new(4.0).add_line(&mut path, PointD::new(0.0, 0.0), PointD::new(10.0, 0.0));
        let r = path.bounding_rect().unwrap();
        assert_eq!((r.x1, r.y1, r.x2, r.y2), (0.0, -2.0, 10.0, 2.0));
        assert_eq!(path.polygon_areas(), [40.0]);
    }

    #[test]
    fn test_square_cap_extends() {
        let mut path = PathStorage::new();
        Stroke::new(4.0)
            .line_cap(LineCap::Square)
            .add_line(&mut path, PointD::new(0.0, 0.0), PointD::new(0.0, 10.0));
        let r = path.bounding_rect().unwrap();
        assert_eq!((r.x1, r.y1, r.x2, r.y2), (-2.0, -2.0, 2.0, 12.0));
    }

    #[test]
    fn test_polyline_consistent_orientation() {
        let mut path = PathStorage::new();
        let pts = [
            PointD::new(0.0, 0.0),
            PointD::new(10.0, 0.0),
            PointD::new(10.0, 10.0),
            PointD::new(0.0, 10.0),
        ];
        Stroke::new(2.0)
            .line_cap(LineCap::Round)
            .line_join(LineJoin::Round)
            .add_polyline(&mut path, &pts);
        let areas = path.polygon_areas();
        // 3 quads + 2 joins + 2 caps.
        assert_eq!(areas.len(), 7);
        assert!(areas.iter().all(|&a| a > 0.0));
    }

    #[test]
    fn test_bevel_join_wedges() {
        let mut path = PathStorage::new();
        let pts = [PointD::new(0.0, 0.0), PointD::new(10.0, 0.0), PointD::new(10.0, 10.0)];
        Stroke::new(2.0).add_polyline(&mut path, &pts);
        // 2 quads + 2 bevel triangles.
        assert_eq!(path.polygon_areas().len(), 4);

        // A straight continuation needs no wedge.
        let mut path = PathStorage::new();
        let pts = [PointD::new(0.0, 0.0), PointD::new(5.0, 0.0), PointD::new(10.0, 0.0)];
        Stroke::new(2.0).add_polyline(&mut path, &pts);
        assert_eq!(path.polygon_areas().len(), 2);
    }

    #[test]
    fn test_degenerate_input() {
        let mut path = PathStorage::new();
        let stroke = Stroke::new(2.0);
        stroke.add_polyline(&mut path, &[]);
        stroke.add_polyline(&mut path, &[PointD::new(1.0, 1.0), PointD::new(1.0, 1.0)]);
        assert!(path.is_empty());

        Stroke::new(2.0)
            .line_cap(LineCap::Round)
            .add_polyline(&mut path, &[PointD::new(1.0, 1.0)]);
        assert_eq!(path.polygon_areas().len(), 1);

        let mut path = PathStorage::new();
        Stroke::new(0.0).add_line(&mut path, PointD::new(0.0, 0.0), PointD::new(5.0, 0.0));
        assert!(path.is_empty());
    }
}
