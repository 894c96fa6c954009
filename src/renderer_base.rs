//! Base renderer over an RGB canvas.
//!
//! Owns an `image::RgbImage` and provides clipped pixel, line and span
//! operations. Colors blend with `Rgba8::lerp` weighted by the color's alpha
//! times the coverage; the canvas itself is always opaque.

use image::{Rgb, RgbImage};

use crate::basics::{CoverType, RectI, COVER_FULL};
use crate::color::Rgba8;

/// Clipped rendering onto an opaque RGB canvas.
pub struct RendererBase {
    img: RgbImage,
    clip_box: RectI,
}

impl RendererBase {
    /// Canvas of `width`×`height` filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba8) -> Self {
        let img = RgbImage::from_pixel(width, height, Rgb(background.to_rgb()));
        Self::from_image(img)
    }

    pub fn from_image(img: RgbImage) -> Self {
        let clip_box = RectI::new(0, 0, img.width() as i32 - 1, img.height() as i32 - 1);
        Self { img, clip_box }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn clip_box(&self) -> &RectI {
        &self.clip_box
    }

    #[inline]
    pub fn inbox(&self, x: i32, y: i32) -> bool {
        x >= self.clip_box.x1 && y >= self.clip_box.y1 && x <= self.clip_box.x2 && y <= self.clip_box.y2
    }

    pub fn image(&self) -> &RgbImage {
        &self.img
    }

    pub fn into_image(self) -> RgbImage {
        self.img
    }

    // ========================================================================
    // Rendering operations (clip then write)
    // ========================================================================

    /// Pixel at (x, y), or black outside the canvas.
    pub fn pixel(&self, x: i32, y: i32) -> Rgba8 {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return Rgba8::black();
        }
        let Rgb([r, g, b]) = *self.img.get_pixel(x as u32, y as u32);
        Rgba8::rgb(r, g, b)
    }

    pub fn blend_pixel(&mut self, x: i32, y: i32, c: &Rgba8, cover: CoverType) {
        if self.inbox(x, y) {
            self.blend_unchecked(x as u32, y as u32, c, cover);
        }
    }

    /// Copy a horizontal line. x1, x2 are inclusive endpoints.
    pub fn copy_hline(&mut self, x1: i32, y: i32, x2: i32, c: &Rgba8) {
        self.blend_hline(x1, y, x2, &Rgba8 { a: 255, ..*c }, COVER_FULL);
    }

    /// Blend a horizontal line. x1, x2 are inclusive endpoints.
    pub fn blend_hline(&mut self, x1: i32, y: i32, x2: i32, c: &Rgba8, cover: CoverType) {
        let (x1, x2) = if x1 > x2 { (x2, x1) } else { (x1, x2) };
        let cb = self.clip_box;
        if y > cb.y2 || y < cb.y1 || x1 > cb.x2 || x2 < cb.x1 {
            return;
        }
        for x in x1.max(cb.x1)..=x2.min(cb.x2) {
            self.blend_unchecked(x as u32, y as u32, c, cover);
        }
    }

    /// Blend a vertical line. y1, y2 are inclusive endpoints.
    pub fn blend_vline(&mut self, x: i32, y1: i32, y2: i32, c: &Rgba8, cover: CoverType) {
        let (y1, y2) = if y1 > y2 { (y2, y1) } else { (y1, y2) };
        let cb = self.clip_box;
        if x > cb.x2 || x < cb.x1 || y1 > cb.y2 || y2 < cb.y1 {
            return;
        }
        for y in y1.max(cb.y1)..=y2.min(cb.y2) {
            self.blend_unchecked(x as u32, y as u32, c, cover);
        }
    }

    /// Blend a solid horizontal span with per-pixel coverage.
    pub fn blend_solid_hspan(&mut self, x: i32, y: i32, c: &Rgba8, covers: &[CoverType]) {
        let cb = self.clip_box;
        if y > cb.y2 || y < cb.y1 {
            return;
        }
        let mut x = x;
        let mut covers = covers;
        if x < cb.x1 {
            let d = (cb.x1 - x) as usize;
            if d >= covers.len() {
                return;
            }
            covers = &covers[d..];
            x = cb.x1;
        }
        let visible = (cb.x2 - x + 1).max(0) as usize;
        for (i, &cover) in covers.iter().take(visible).enumerate() {
            self.blend_unchecked(x as u32 + i as u32, y as u32, c, cover);
        }
    }

    #[inline]
    fn blend_unchecked(&mut self, x: u32, y: u32, c: &Rgba8, cover: CoverType) {
        let alpha = Rgba8::mult_cover(c.a, cover);
        if alpha == 0 {
            return;
        }
        let p = self.img.get_pixel_mut(x, y);
        if alpha == 255 {
            *p = Rgb(c.to_rgb());
        } else {
            p.0[0] = Rgba8::lerp(p.0[0], c.r, alpha);
            p.0[1] = Rgba8::lerp(p.0[1], c.g, alpha);
            p.0[2] = Rgba8::lerp(p.0[2], c.b, alpha);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_background() {
        let rb = RendererBase::new(4, 3, Rgba8::rgb(1, 2, 3));
        assert_eq!((rb.width(), rb.height()), (4, 3));
        assert!(rb.image().pixels().all(|p| p.0 == [1, 2, 3]));
    }

    #[test]
    fn test_blend_pixel_and_clip() {
        let mut rb = RendererBase::new(4, 4, Rgba8::white());
        rb.blend_pixel(1, 1, &Rgba8::black(), 255);
        assert_eq!(rb.pixel(1, 1), Rgba8::black());
        rb.blend_pixel(2, 2, &Rgba8::black(), 128);
        assert_eq!(rb.pixel(2, 2), Rgba8::rgb(127, 127, 127));
        // Out of bounds is a no-op.
        rb.blend_pixel(-1, 0, &Rgba8::black(), 255);
        rb.blend_pixel(4, 0, &Rgba8::black(), 255);
        assert_eq!(rb.pixel(9, 9), Rgba8::black());
    }

    #[test]
    fn test_translucent_color() {
        let mut rb = RendererBase::new(1, 1, Rgba8::white());
        rb.blend_pixel(0, 0, &Rgba8::black().with_opacity(0.5), 255);
        let p = rb.pixel(0, 0);
        assert!((126..=128).contains(&p.r));
    }

    #[test]
    fn test_hline_vline_clipped() {
        let mut rb = RendererBase::new(5, 5, Rgba8::white());
        rb.copy_hline(-3, 2, 10, &Rgba8::black());
        assert!((0..5).all(|x| rb.pixel(x, 2) == Rgba8::black()));
        rb.blend_vline(4, 10, -10, &Rgba8::rgb(255, 0, 0), 255);
        assert!((0..5).all(|y| rb.pixel(4, y) == Rgba8::rgb(255, 0, 0)));
        assert_eq!(rb.pixel(0, 0), Rgba8::white());
    }

    #[test]
    fn test_blend_solid_hspan_clipped() {
        let mut rb = RendererBase::new(4, 1, Rgba8::white());
        rb.blend_solid_hspan(-2, 0, &Rgba8::black(), &[255, 255, 255, 0, 255, 255, 255]);
        assert_eq!(rb.pixel(0, 0), Rgba8::black());
        assert_eq!(rb.pixel(1, 0), Rgba8::white());
        assert_eq!(rb.pixel(3, 0), Rgba8::black());
    }

    #[test]
    fn test_clip_box_is_canvas() {
        let rb = RendererBase::new(10, 6, Rgba8::white());
        let cb = rb.clip_box();
        assert_eq!((cb.x1, cb.y1, cb.x2, cb.y2), (0, 0, 9, 5));
        assert!(rb.inbox(0, 0) && rb.inbox(9, 5));
        assert!(!rb.inbox(10, 5) && !rb.inbox(-1, 0));
    }
}
