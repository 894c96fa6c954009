//! Background decorations painted before any diagram geometry.
//!
//! Spacing and radii are given in logical units and multiplied by the
//! canvas scale. The scattered-circle decoration draws from a seeded RNG so
//! repeated renders are pixel-identical.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::basics::{PointD, COVER_FULL};
use crate::color::Rgba8;
use crate::config::{BackgroundStyle, Theme};
use crate::ellipse::Ellipse;
use crate::path_storage::PathStorage;
use crate::rasterizer_scanline_aa::{render_scanlines_aa_solid, RasterizerScanlineAa};
use crate::renderer_base::RendererBase;

pub const GRID_STEP: f64 = 40.0;
pub const DOT_STEP: f64 = 30.0;
pub const DOT_RADIUS: f64 = 2.0;
pub const CIRCLE_SEED: u64 = 42;
pub const CIRCLE_COUNT: usize = 5;
pub const CIRCLE_MIN_RADIUS: f64 = 100.0;
pub const CIRCLE_MAX_RADIUS: f64 = 400.0;

/// One decorative circle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: PointD,
    pub radius: f64,
    pub color: Rgba8,
}

/// Paint the decoration selected by `style` over the already cleared canvas.
pub fn draw_background(ren: &mut RendererBase, style: BackgroundStyle, theme: &Theme, scale: f64) {
    debug!("background {style:?} at {}x{}", ren.width(), ren.height());
    match style {
        BackgroundStyle::Plain => {}
        BackgroundStyle::Grid => draw_grid(ren, &theme.grid_color, scaled_step(GRID_STEP, scale)),
        BackgroundStyle::Dots => draw_dots(
            ren,
            &theme.dot_color,
            scaled_step(DOT_STEP, scale),
            (DOT_RADIUS * scale).floor(),
        ),
        BackgroundStyle::Circle => {
            let circles = scatter_circles(
                ren.width(),
                ren.height(),
                &theme.circle_colors,
                scale,
                CIRCLE_SEED,
            );
            draw_circles(ren, &circles, theme.circle_opacity);
        }
        BackgroundStyle::Gradient => draw_gradient(ren, &theme.gradient_top, &theme.gradient_bottom),
    }
}

fn scaled_step(step: f64, scale: f64) -> u32 {
    ((step * scale) as u32).max(1)
}

/// One-pixel lines every `step` pixels, starting at the origin.
pub fn draw_grid(ren: &mut RendererBase, color: &Rgba8, step: u32) {
    let (w, h) = (ren.width() as i32, ren.height() as i32);
    for x in (0..w).step_by(step as usize) {
        ren.blend_vline(x, 0, h - 1, color, COVER_FULL);
    }
    for y in (0..h).step_by(step as usize) {
        ren.blend_hline(0, y, w - 1, color, COVER_FULL);
    }
}

/// Filled dots on a `step` lattice offset by half a step.
pub fn draw_dots(ren: &mut RendererBase, color: &Rgba8, step: u32, radius: f64) {
    if radius <= 0.0 {
        return;
    }
    let mut path = PathStorage::new();
    for x in (step / 2..ren.width()).step_by(step as usize) {
        for y in (step / 2..ren.height()).step_by(step as usize) {
            let dot = Ellipse::circle(PointD::new(x as f64, y as f64), radius);
            path.add_polygon(&dot.points());
        }
    }
    let mut ras = RasterizerScanlineAa::new();
    ras.add_path(&mut path, 0);
    render_scanlines_aa_solid(&mut ras, ren, color);
}

/// `CIRCLE_COUNT` circles drawn from `StdRng::seed_from_u64(seed)`.
///
/// Per circle the draws are center x in `[0, width]`, center y in
/// `[0, height]`, radius in `[100·scale, 400·scale]` and a color index.
pub fn scatter_circles(
    width: u32,
    height: u32,
    colors: &[Rgba8],
    scale: f64,
    seed: u64,
) -> Vec<Circle> {
    let fallback = [Theme::default().circle_colors[0]];
    let colors = if colors.is_empty() { &fallback[..] } else { colors };
    let r_min = (CIRCLE_MIN_RADIUS * scale) as u32;
    let r_max = ((CIRCLE_MAX_RADIUS * scale) as u32).max(r_min);

    let mut rng = StdRng::seed_from_u64(seed);
    (0..CIRCLE_COUNT)
        .map(|_| {
            let cx = rng.random_range(0..=width);
            let cy = rng.random_range(0..=height);
            let r = rng.random_range(r_min..=r_max);
            let color = colors[rng.random_range(0..colors.len())];
            Circle {
                center: PointD::new(cx as f64, cy as f64),
                radius: r as f64,
                color,
            }
        })
        .collect()
}

/// Fill each circle blended at `opacity`.
pub fn draw_circles(ren: &mut RendererBase, circles: &[Circle], opacity: f64) {
    let mut ras = RasterizerScanlineAa::new();
    for c in circles {
        let mut e = Ellipse::circle(c.center, c.radius);
        ras.add_path(&mut e, 0);
        render_scanlines_aa_solid(&mut ras, ren, &c.color.with_opacity(opacity));
    }
}

/// Vertical two-stop gradient, one color per row.
pub fn draw_gradient(ren: &mut RendererBase, top: &Rgba8, bottom: &Rgba8) {
    let (w, h) = (ren.width() as i32, ren.height());
    for y in 0..h {
        let c = top.gradient(bottom, y as f64 / h as f64);
        ren.copy_hline(0, y as i32, w - 1, &c);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scatter_circles_deterministic() {
        let colors = [Rgba8::rgb(255, 224, 178), Rgba8::rgb(255, 204, 188)];
        let a = scatter_circles(2160, 800, &colors, 2.0, CIRCLE_SEED);
        let b = scatter_circles(2160, 800, &colors, 2.0, CIRCLE_SEED);
        assert_eq!(a, b);
        assert_eq!(a.len(), CIRCLE_COUNT);
        for c in &a {
            assert!((0.0..=2160.0).contains(&c.center.x));
            assert!((0.0..=800.0).contains(&c.center.y));
            assert!((200.0..=800.0).contains(&c.radius));
            assert!(colors.contains(&c.color));
        }
        assert_ne!(a, scatter_circles(2160, 800, &colors, 2.0, 7));
    }

    #[test]
    fn test_scatter_circles_empty_palette() {
        let c = scatter_circles(100, 100, &[], 1.0, CIRCLE_SEED);
        assert!(c.iter().all(|c| c.color == Rgba8::rgb(240, 240, 240)));
    }

    #[test]
    fn test_grid_lines() {
        let mut ren = RendererBase::new(100, 100, Rgba8::white());
        let c = Rgba8::rgb(220, 220, 220);
        draw_grid(&mut ren, &c, 40);
        assert_eq!(ren.pixel(0, 17), c);
        assert_eq!(ren.pixel(40, 17), c);
        assert_eq!(ren.pixel(80, 99), c);
        assert_eq!(ren.pixel(17, 40), c);
        assert_eq!(ren.pixel(41, 41), Rgba8::white());
    }

    #[test]
    fn test_dots_lattice() {
        let mut ren = RendererBase::new(120, 120, Rgba8::white());
        let c = Rgba8::rgb(30, 41, 59);
        draw_dots(&mut ren, &c, 60, 4.0);
        assert_eq!(ren.pixel(30, 30), c);
        assert_eq!(ren.pixel(90, 30), c);
        assert_eq!(ren.pixel(60, 60), Rgba8::white());
        assert_eq!(ren.pixel(0, 0), Rgba8::white());
    }

    #[test]
    fn test_gradient_rows() {
        let mut ren = RendererBase::new(4, 100, Rgba8::white());
        let top = Rgba8::rgb(240, 253, 244);
        let bottom = Rgba8::rgb(220, 252, 231);
        draw_gradient(&mut ren, &top, &bottom);
        assert_eq!(ren.pixel(0, 0), top);
        assert_eq!(ren.pixel(3, 50), Rgba8::rgb(230, 252, 237));
        let last = ren.pixel(0, 99);
        assert!((bottom.r..=221).contains(&last.r));
    }

    #[test]
    fn test_circles_translucent() {
        let mut ren = RendererBase::new(50, 50, Rgba8::white());
        let circle = Circle {
            center: PointD::new(25.0, 25.0),
            radius: 20.0,
            color: Rgba8::black(),
        };
        draw_circles(&mut ren, &[circle], 0.6);
        let p = ren.pixel(25, 25);
        assert!((100..=104).contains(&p.r), "got {}", p.r);
        assert_eq!(ren.pixel(1, 1), Rgba8::white());
    }

    #[test]
    fn test_plain_is_noop() {
        let mut ren = RendererBase::new(10, 10, Rgba8::white());
        draw_background(&mut ren, BackgroundStyle::Plain, &Theme::default(), 2.0);
        assert!(ren.image().pixels().all(|p| p.0 == [255, 255, 255]));
    }
}
