//! Path storage: the vertex container fed to the rasterizer.
//!
//! Stores vertices with path commands in a flat `Vec`. Quadratic and cubic
//! curves are flattened on insertion by forward differencing, so the stored
//! path only ever holds `move_to`, `line_to` and `end_poly` commands.

use crate::basics::{
    is_end_poly, is_move_to, is_stop, is_vertex, PointD, RectD, VertexSource, PATH_CMD_END_POLY,
    PATH_CMD_LINE_TO, PATH_CMD_MOVE_TO, PATH_CMD_STOP, PATH_FLAGS_CLOSE,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Vertex {
    x: f64,
    y: f64,
    cmd: u32,
}

impl Vertex {
    fn new(x: f64, y: f64, cmd: u32) -> Self {
        Self { x, y, cmd }
    }
}

/// Ordered sequence of sub-paths. Implements `VertexSource`.
#[derive(Debug, Clone, Default)]
pub struct PathStorage {
    vertices: Vec<Vertex>,
    iterator: usize,
    scale: f64,
}

impl PathStorage {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            iterator: 0,
            scale: 1.0,
        }
    }

    /// Curve subdivision density; 1.0 means roughly one step per four units
    /// of control polygon length.
    pub fn set_approximation_scale(&mut self, scale: f64) {
        self.scale = if scale > 0.0 { scale } else { 1.0 };
    }

    pub fn approximation_scale(&self) -> f64 {
        if self.scale > 0.0 {
            self.scale
        } else {
            1.0
        }
    }

    // ---------------------------------------------------------------
    // Path construction
    // ---------------------------------------------------------------

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.vertices.push(Vertex::new(x, y, PATH_CMD_MOVE_TO));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.vertices.push(Vertex::new(x, y, PATH_CMD_LINE_TO));
    }

    /// Quadratic Bézier from the last vertex through `(x_ctrl, y_ctrl)`.
    pub fn curve3(&mut self, x_ctrl: f64, y_ctrl: f64, x_to: f64, y_to: f64) {
        let (x1, y1) = self.last_xy();
        let len = (x_ctrl - x1).hypot(y_ctrl - y1) + (x_to - x_ctrl).hypot(y_to - y_ctrl);
        let steps = self.num_steps(len);
        let step = 1.0 / steps as f64;
        let step2 = step * step;

        let tmpx = (x1 - x_ctrl * 2.0 + x_to) * step2;
        let tmpy = (y1 - y_ctrl * 2.0 + y_to) * step2;
        let (mut fx, mut fy) = (x1, y1);
        let mut dfx = tmpx + (x_ctrl - x1) * (2.0 * step);
        let mut dfy = tmpy + (y_ctrl - y1) * (2.0 * step);
        let (ddfx, ddfy) = (tmpx * 2.0, tmpy * 2.0);

        for _ in 1..steps {
            fx += dfx;
            fy += dfy;
            dfx += ddfx;
            dfy += ddfy;
            self.line_to(fx, fy);
        }
        self.line_to(x_to, y_to);
    }

    /// Cubic Bézier from the last vertex.
    pub fn curve4(
        &mut self,
        x_ctrl1: f64,
        y_ctrl1: f64,
        x_ctrl2: f64,
        y_ctrl2: f64,
        x_to: f64,
        y_to: f64,
    ) {
        let (x1, y1) = self.last_xy();
        let len = (x_ctrl1 - x1).hypot(y_ctrl1 - y1)
            + (x_ctrl2 - x_ctrl1).hypot(y_ctrl2 - y_ctrl1)
            + (x_to - x_ctrl2).hypot(y_to - y_ctrl2);
        let steps = self.num_steps(len);
        let step = 1.0 / steps as f64;
        let step2 = step * step;
        let step3 = step2 * step;

        let pre1 = 3.0 * step;
        let pre2 = 3.0 * step2;
        let pre4 = 6.0 * step2;
        let pre5 = 6.0 * step3;

        let tmp1x = x1 - x_ctrl1 * 2.0 + x_ctrl2;
        let tmp1y = y1 - y_ctrl1 * 2.0 + y_ctrl2;
        let tmp2x = (x_ctrl1 - x_ctrl2) * 3.0 - x1 + x_to;
        let tmp2y = (y_ctrl1 - y_ctrl2) * 3.0 - y1 + y_to;

        let (mut fx, mut fy) = (x1, y1);
        let mut dfx = (x_ctrl1 - x1) * pre1 + tmp1x * pre2 + tmp2x * step3;
        let mut dfy = (y_ctrl1 - y1) * pre1 + tmp1y * pre2 + tmp2y * step3;
        let mut ddfx = tmp1x * pre4 + tmp2x * pre5;
        let mut ddfy = tmp1y * pre4 + tmp2y * pre5;
        let dddfx = tmp2x * pre5;
        let dddfy = tmp2y * pre5;

        for _ in 1..steps {
            fx += dfx;
            fy += dfy;
            dfx += ddfx;
            dfy += ddfy;
            ddfx += dddfx;
            ddfy += dddfy;
            self.line_to(fx, fy);
        }
        self.line_to(x_to, y_to);
    }

    fn num_steps(&self, len: f64) -> u32 {
        ((len * 0.25 * self.approximation_scale()).round() as u32).max(4)
    }

    /// Close the current sub-path.
    pub fn close_polygon(&mut self) {
        if is_vertex(self.last_command()) {
            self.vertices.push(Vertex::new(
                0.0,
                0.0,
                PATH_CMD_END_POLY | PATH_FLAGS_CLOSE,
            ));
        }
    }

    /// Append a closed polygon.
    pub fn add_polygon(&mut self, points: &[PointD]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.move_to(first.x, first.y);
        for p in rest {
            self.line_to(p.x, p.y);
        }
        self.close_polygon();
    }

    /// Append every vertex of `vs`.
    pub fn concat_path(&mut self, vs: &mut dyn VertexSource, path_id: u32) {
        let (mut x, mut y) = (0.0, 0.0);
        vs.rewind(path_id);
        loop {
            let cmd = vs.vertex(&mut x, &mut y);
            if is_stop(cmd) {
                break;
            }
            self.vertices.push(Vertex::new(x, y, cmd));
        }
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    pub fn total_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn last_command(&self) -> u32 {
        self.vertices.last().map_or(PATH_CMD_STOP, |v| v.cmd)
    }

    fn last_xy(&self) -> (f64, f64) {
        self.vertices
            .iter()
            .rev()
            .find(|v| is_vertex(v.cmd))
            .map_or((0.0, 0.0), |v| (v.x, v.y))
    }

    /// Bounding box of all vertices, `None` for an empty path.
    pub fn bounding_rect(&self) -> Option<RectD> {
        let mut it = self.vertices.iter().filter(|v| is_vertex(v.cmd));
        let first = it.next()?;
        let mut r = RectD::new(first.x, first.y, first.x, first.y);
        for v in it {
            r.x1 = r.x1.min(v.x);
            r.y1 = r.y1.min(v.y);
            r.x2 = r.x2.max(v.x);
            r.y2 = r.y2.max(v.y);
        }
        Some(r)
    }

    /// Signed area of each sub-path, positive for counter-clockwise in a
    /// y-up frame.
    pub fn polygon_areas(&self) -> Vec<f64> {
        self.polygon_ranges()
            .into_iter()
            .map(|(start, end)| self.signed_area(start, end))
            .collect()
    }

    // ---------------------------------------------------------------
    // Transformations
    // ---------------------------------------------------------------

    /// Make every sub-path wind the same way (positive area when
    /// `positive` is set). Overlapping polygons then accumulate instead of
    /// cancelling under the nonzero fill rule.
    pub fn arrange_orientations_all_paths(&mut self, positive: bool) {
        for (start, end) in self.polygon_ranges() {
            let area = self.signed_area(start, end);
            if area != 0.0 && (area > 0.0) != positive {
                self.invert_polygon_range(start, end);
            }
        }
    }

    /// Vertex index ranges `[start, end)` of each sub-path, commands
    /// excluded.
    fn polygon_ranges(&self) -> Vec<(usize, usize)> {
        let mut ranges = Vec::new();
        let total = self.vertices.len();
        let mut start = 0;
        while start < total {
            while start < total && !is_move_to(self.vertices[start].cmd) {
                start += 1;
            }
            let mut end = start + 1;
            while end < total && is_vertex(self.vertices[end].cmd) && !is_move_to(self.vertices[end].cmd) {
                end += 1;
            }
            if start < total {
                ranges.push((start, end.min(total)));
            }
            start = end;
            while start < total && is_end_poly(self.vertices[start].cmd) {
                start += 1;
            }
        }
        ranges
    }

    fn signed_area(&self, start: usize, end: usize) -> f64 {
        let pts = &self.vertices[start..end];
        let mut sum = 0.0;
        for (i, a) in pts.iter().enumerate() {
            let b = &pts[(i + 1) % pts.len()];
            sum += a.x * b.y - b.x * a.y;
        }
        sum * 0.5
    }

    /// Reverse the vertex order of `[start, end)`, keeping the move_to at
    /// the front.
    fn invert_polygon_range(&mut self, start: usize, end: usize) {
        if end <= start + 1 {
            return;
        }
        let tmp_cmd = self.vertices[start].cmd;
        let end = end - 1;
        for i in start..end {
            self.vertices[i].cmd = self.vertices[i + 1].cmd;
        }
        self.vertices[end].cmd = tmp_cmd;
        self.vertices[start..=end].reverse();
    }
}

impl VertexSource for PathStorage {
    fn rewind(&mut self, path_id: u32) {
        self.iterator = path_id as usize;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        let Some(v) = self.vertices.get(self.iterator) else {
            return PATH_CMD_STOP;
        };
        *x = v.x;
        *y = v.y;
        self.iterator += 1;
        v.cmd
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(ps: &mut PathStorage) -> Vec<(f64, f64, u32)> {
        let mut out = Vec::new();
        let (mut x, mut y) = (0.0, 0.0);
        ps.rewind(0);
        loop {
            let cmd = ps.vertex(&mut x, &mut y);
            if is_stop(cmd) {
                break;
            }
            out.push((x, y, cmd));
        }
        out
    }

    fn square(ccw: bool) -> Vec<PointD> {
        let mut pts = vec![
            PointD::new(0.0, 0.0),
            PointD::new(10.0, 0.0),
            PointD::new(10.0, 10.0),
            PointD::new(0.0, 10.0),
        ];
        if !ccw {
            pts.reverse();
        }
        pts
    }

    #[test]
    fn test_move_line_close() {
        let mut ps = PathStorage::new();
        ps.move_to(1.0, 2.0);
        ps.line_to(3.0, 4.0);
        ps.close_polygon();
        ps.close_polygon();
        let v = collect(&mut ps);
        assert_eq!(v.len(), 3);
        assert_eq!(v[0], (1.0, 2.0, PATH_CMD_MOVE_TO));
        assert_eq!(v[1], (3.0, 4.0, PATH_CMD_LINE_TO));
        assert!(is_end_poly(v[2].2));
    }

    #[test]
    fn test_curve3_endpoints() {
        let mut ps = PathStorage::new();
        ps.move_to(0.0, 0.0);
        ps.curve3(50.0, 100.0, 100.0, 0.0);
        let v = collect(&mut ps);
        assert!(v.len() > 5);
        assert!(v.iter().skip(1).all(|p| p.2 == PATH_CMD_LINE_TO));
        let last = v[v.len() - 1];
        assert_eq!((last.0, last.1), (100.0, 0.0));
        // Apex of the parabola is at y = 50.
        let max_y = v.iter().map(|p| p.1).fold(0.0, f64::max);
        assert!((max_y - 50.0).abs() < 1.0);
    }

    #[test]
    fn test_curve4_endpoints() {
        let mut ps = PathStorage::new();
        ps.move_to(0.0, 0.0);
        ps.curve4(0.0, 100.0, 100.0, 100.0, 100.0, 0.0);
        let v = collect(&mut ps);
        let last = v[v.len() - 1];
        assert_eq!((last.0, last.1), (100.0, 0.0));
        let max_y = v.iter().map(|p| p.1).fold(0.0, f64::max);
        assert!((max_y - 75.0).abs() < 1.0);
    }

    #[test]
    fn test_approximation_scale_adds_steps() {
        let mut coarse = PathStorage::new();
        coarse.move_to(0.0, 0.0);
        coarse.curve3(50.0, 100.0, 100.0, 0.0);
        let mut fine = PathStorage::new();
        fine.set_approximation_scale(4.0);
        fine.move_to(0.0, 0.0);
        fine.curve3(50.0, 100.0, 100.0, 0.0);
        assert!(fine.total_vertices() > coarse.total_vertices());
    }

    #[test]
    fn test_bounding_rect() {
        let mut ps = PathStorage::new();
        assert!(ps.bounding_rect().is_none());
        let shifted: Vec<PointD> = square(true)
            .into_iter()
            .map(|p| PointD::new(p.x + 5.0, p.y - 5.0))
            .collect();
        ps.add_polygon(&shifted);
        let r = ps.bounding_rect().unwrap();
        assert_eq!((r.x1, r.y1, r.x2, r.y2), (5.0, -5.0, 15.0, 5.0));
    }

    #[test]
    fn test_arrange_orientations() {
        let mut ps = PathStorage::new();
        ps.add_polygon(&square(true));
        ps.add_polygon(&square(false));
        let areas = ps.polygon_areas();
        assert_eq!(areas, [100.0, -100.0]);

        ps.arrange_orientations_all_paths(true);
        assert_eq!(ps.polygon_areas(), [100.0, 100.0]);
        // Structure survives: move_to first, end_poly after each polygon.
        let v = collect(&mut ps);
        assert_eq!(v.len(), 10);
        assert_eq!(v[5].2, PATH_CMD_MOVE_TO);
        assert!(is_end_poly(v[9].2));

        ps.arrange_orientations_all_paths(false);
        assert_eq!(ps.polygon_areas(), [-100.0, -100.0]);
    }

    #[test]
    fn test_concat_path() {
        let mut a = PathStorage::new();
        a.add_polygon(&square(true));
        let mut b = PathStorage::new();
        b.concat_path(&mut a, 0);
        assert_eq!(b.total_vertices(), a.total_vertices());
    }
}
