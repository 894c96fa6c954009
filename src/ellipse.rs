//! Ellipse vertex generator.
//!
//! Approximates an ellipse as a regular polygon. Used for dots, decorative
//! circles, and the round caps and joins of strokes.

use crate::basics::{
    uround, PointD, VertexSource, PATH_CMD_END_POLY, PATH_CMD_LINE_TO, PATH_CMD_MOVE_TO,
    PATH_CMD_STOP, PATH_FLAGS_CLOSE, PI,
};

/// Fewest polygon sides emitted for any radius.
const MIN_STEPS: u32 = 8;

/// Closed counter-clockwise polygon approximating an ellipse.
///
/// The step count follows from the radii and the approximation scale so
/// that the polygon deviates from the true curve by at most 1/8 unit at
/// that scale.
#[derive(Debug, Clone)]
pub struct Ellipse {
    x: f64,
    y: f64,
    rx: f64,
    ry: f64,
    scale: f64,
    num: u32,
    step: u32,
}

impl Ellipse {
    pub fn new(x: f64, y: f64, rx: f64, ry: f64) -> Self {
        let mut e = Self {
            x,
            y,
            rx,
            ry,
            scale: 1.0,
            num: 0,
            step: 0,
        };
        e.calc_num_steps();
        e
    }

    /// Circle shorthand.
    pub fn circle(center: PointD, r: f64) -> Self {
        Self::new(center.x, center.y, r, r)
    }

    /// Fixed number of polygon sides.
    pub fn with_steps(mut self, num_steps: u32) -> Self {
        self.num = num_steps.max(3);
        self
    }

    /// Set approximation scale (affects automatic step count).
    pub fn set_approximation_scale(&mut self, scale: f64) {
        self.scale = scale;
        self.calc_num_steps();
    }

    pub fn num_steps(&self) -> u32 {
        self.num
    }

    fn calc_num_steps(&mut self) {
        let ra = (self.rx.abs() + self.ry.abs()) / 2.0;
        let da = (ra / (ra + 0.125 / self.scale)).acos() * 2.0;
        self.num = uround(2.0 * PI / da).max(MIN_STEPS);
    }

    /// Polygon corners in emission order.
    pub fn points(&self) -> Vec<PointD> {
        (0..self.num).map(|i| self.point(i)).collect()
    }

    fn point(&self, i: u32) -> PointD {
        let angle = i as f64 / self.num as f64 * 2.0 * PI;
        PointD::new(
            self.x + angle.cos() * self.rx,
            self.y + angle.sin() * self.ry,
        )
    }
}

impl VertexSource for Ellipse {
    fn rewind(&mut self, _path_id: u32) {
        self.step = 0;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        if self.step == self.num {
            self.step += 1;
            return PATH_CMD_END_POLY | PATH_FLAGS_CLOSE;
        }
        if self.step > self.num {
            return PATH_CMD_STOP;
        }
        let p = self.point(self.step);
        *x = p.x;
        *y = p.y;
        self.step += 1;
        if self.step == 1 {
            PATH_CMD_MOVE_TO
        } else {
            PATH_CMD_LINE_TO
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
