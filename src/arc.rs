//! Arc vertex generator.
//!
//! Emits an open polyline along a circular or elliptical arc between two
//! angles. The cloud line style strokes half-turn arcs built here.

use crate::basics::{
    is_stop, PointD, VertexSource, PATH_CMD_LINE_TO, PATH_CMD_MOVE_TO, PATH_CMD_STOP, PI,
};

/// Vertices along an arc from `start` to `end` (radians).
///
/// `ccw` walks toward increasing angles; otherwise toward decreasing ones.
/// Angles are normalized so the walk always reaches `end`.
#[derive(Debug, Clone)]
pub struct Arc {
    x: f64,
    y: f64,
    rx: f64,
    ry: f64,
    angle: f64,
    start: f64,
    end: f64,
    scale: f64,
    da: f64,
    ccw: bool,
    path_cmd: u32,
}

impl Arc {
    pub fn new(x: f64, y: f64, rx: f64, ry: f64, a1: f64, a2: f64, ccw: bool) -> Self {
        let mut arc = Self {
            x,
            y,
            rx,
            ry,
            angle: 0.0,
            start: 0.0,
            end: 0.0,
            scale: 1.0,
            da: 0.0,
            ccw,
            path_cmd: PATH_CMD_STOP,
        };
        arc.normalize(a1, a2, ccw);
        arc
    }

    pub fn set_approximation_scale(&mut self, s: f64) {
        self.scale = s;
        self.normalize(self.start, self.end, self.ccw);
    }

    fn normalize(&mut self, a1: f64, a2: f64, ccw: bool) {
        let ra = (self.rx.abs() + self.ry.abs()) / 2.0;
        self.da = (ra / (ra + 0.125 / self.scale)).acos() * 2.0;

        let (mut a1, mut a2) = (a1, a2);
        if ccw {
            while a2 < a1 {
                a2 += PI * 2.0;
            }
        } else {
            while a1 < a2 {
                a1 += PI * 2.0;
            }
            self.da = -self.da;
        }
        self.ccw = ccw;
        self.start = a1;
        self.end = a2;
    }

    /// Every vertex from start to end.
    pub fn points(&mut self) -> Vec<PointD> {
        let mut out = Vec::new();
        let (mut x, mut y) = (0.0, 0.0);
        self.rewind(0);
        while !is_stop(self.vertex(&mut x, &mut y)) {
            out.push(PointD::new(x, y));
        }
        out
    }
}

impl VertexSource for Arc {
    fn rewind(&mut self, _path_id: u32) {
        self.path_cmd = PATH_CMD_MOVE_TO;
        self.angle = self.start;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        if is_stop(self.path_cmd) {
            return PATH_CMD_STOP;
        }
        if (self.angle < self.end - self.da / 4.0) != self.ccw {
            *x = self.x + self.end.cos() * self.rx;
            *y = self.y + self.end.sin() * self.ry;
            self.path_cmd = PATH_CMD_STOP;
            return PATH_CMD_LINE_TO;
        }

        *x = self.x + self.angle.cos() * self.rx;
        *y = self.y + self.angle.sin() * self.ry;
        self.angle += self.da;

        let cmd = self.path_cmd;
        self.path_cmd = PATH_CMD_LINE_TO;
        cmd
    }
}

// ============================================================================
// Tests
// ============================================================================
