//! Image codec seam between the renderer and the file format.
//!
//! The renderer only needs "pixels in, bytes out", optionally with a
//! reduced palette, so it can measure the result against a byte budget
//! before anything touches the filesystem.

use std::collections::HashMap;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbImage};

use crate::error::Result;

/// Turns a finished canvas into file bytes.
pub trait ImageCodec {
    /// Encode `img`. With `palette` set, reduce to at most that many
    /// colors first.
    fn encode(&self, img: &RgbImage, palette: Option<usize>) -> Result<Vec<u8>>;

    /// File extension without the dot.
    fn extension(&self) -> &str {
        "png"
    }
}

// ============================================================================
// PngCodec
// ============================================================================

/// PNG at maximum compression; reduced palettes are written as indexed
/// 8-bit PNGs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn encode(&self, img: &RgbImage, palette: Option<usize>) -> Result<Vec<u8>> {
        match palette {
            Some(n) => encode_indexed(img, n),
            None => encode_rgb(img),
        }
    }
}

fn encode_rgb(img: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, CompressionType::Best, FilterType::Adaptive);
    encoder.write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgb8)?;
    Ok(buf)
}

fn encode_indexed(img: &RgbImage, max_colors: usize) -> Result<Vec<u8>> {
    let (palette, indices) = quantize(img, max_colors);
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, img.width(), img.height());
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(palette.concat());
        encoder.set_compression(png::Compression::Best);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&indices)?;
        writer.finish()?;
    }
    Ok(buf)
}

// ============================================================================
// Median-cut quantizer
// ============================================================================

/// A set of distinct colors with their pixel counts.
struct ColorBox {
    colors: Vec<([u8; 3], u32)>,
}

impl ColorBox {
    /// Widest channel and its extent.
    fn widest_channel(&self) -> (usize, u8) {
        (0..3)
            .map(|c| {
                let (lo, hi) = self
                    .colors
                    .iter()
                    .fold((u8::MAX, u8::MIN), |(lo, hi), (rgb, _)| (lo.min(rgb[c]), hi.max(rgb[c])));
                (c, hi.saturating_sub(lo))
            })
            .max_by_key(|&(_, extent)| extent)
            .unwrap_or((0, 0))
    }

    /// Split at the pixel-weighted median of the widest channel.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let (channel, _) = self.widest_channel();
        self.colors.sort_unstable_by_key(|(rgb, _)| rgb[channel]);
        let total: u64 = self.colors.iter().map(|&(_, n)| n as u64).sum();
        let mut acc = 0u64;
        let mut cut = 1;
        for (i, &(_, n)) in self.colors.iter().enumerate() {
            acc += n as u64;
            if acc * 2 >= total {
                cut = i + 1;
                break;
            }
        }
        let cut = cut.clamp(1, self.colors.len() - 1);
        let rest = self.colors.split_off(cut);
        (self, ColorBox { colors: rest })
    }

    fn average(&self) -> [u8; 3] {
        let mut sum = [0u64; 3];
        let mut count = 0u64;
        for &(rgb, n) in &self.colors {
            for c in 0..3 {
                sum[c] += rgb[c] as u64 * n as u64;
            }
            count += n as u64;
        }
        let count = count.max(1);
        sum.map(|s| ((s + count / 2) / count) as u8)
    }
}

/// Reduce `img` to at most `max_colors` (clamped to 1..=256) colors.
/// Returns the palette and one palette index per pixel.
pub fn quantize(img: &RgbImage, max_colors: usize) -> (Vec<[u8; 3]>, Vec<u8>) {
    let max_colors = max_colors.clamp(1, 256);
    let mut histogram: HashMap<[u8; 3], u32> = HashMap::new();
    for p in img.pixels() {
        *histogram.entry(p.0).or_insert(0) += 1;
    }
    let mut colors: Vec<_> = histogram.into_iter().collect();
    // HashMap order is random; sort so the palette is reproducible.
    colors.sort_unstable();

    let mut boxes = vec![ColorBox { colors }];
    while boxes.len() < max_colors {
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.colors.len() > 1)
            .max_by_key(|(i, b)| (b.widest_channel().1, std::cmp::Reverse(*i)))
            .map(|(i, _)| i);
        let Some(i) = candidate else {
            break;
        };
        let (a, b) = boxes.swap_remove(i).split();
        boxes.push(a);
        boxes.push(b);
    }

    let mut lookup = HashMap::new();
    let palette = boxes
        .iter()
        .enumerate()
        .map(|(i, b)| {
            for &(rgb, _) in &b.colors {
                lookup.insert(rgb, i as u8);
            }
            b.average()
        })
        .collect();
    let indices = img.pixels().map(|p| lookup.get(&p.0).copied().unwrap_or(0)).collect();
    (palette, indices)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient_image(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| Rgb([(x * 255 / w) as u8, (y * 255 / h) as u8, 128]))
    }

    #[test]
    fn test_quantize_few_colors_exact() {
        let img = RgbImage::from_fn(4, 1, |x, _| if x < 2 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) });
        let (palette, indices) = quantize(&img, 16);
        assert_eq!(palette.len(), 2);
        assert_eq!(indices[0], indices[1]);
        assert_ne!(indices[1], indices[2]);
        assert_eq!(palette[indices[0] as usize], [255, 0, 0]);
        assert_eq!(palette[indices[3] as usize], [0, 0, 255]);
    }

    #[test]
    fn test_quantize_bounds_palette() {
        let img = gradient_image(64, 64);
        for n in [1, 32, 85, 256, 1000] {
            let (palette, indices) = quantize(&img, n);
            assert!(palette.len() <= n.clamp(1, 256));
            assert_eq!(indices.len(), 64 * 64);
            assert!(indices.iter().all(|&i| (i as usize) < palette.len()));
        }
    }

    #[test]
    fn test_quantize_deterministic() {
        let img = gradient_image(40, 30);
        assert_eq!(quantize(&img, 32), quantize(&img, 32));
    }

    #[test]
    fn test_png_signature() {
        let img = gradient_image(32, 16);
        for palette in [None, Some(32)] {
            let bytes = PngCodec.encode(&img, palette).unwrap();
            assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (32, 16));
        }
    }

    #[test]
    fn test_palette_shrinks_noisy_image() {
        let img = RgbImage::from_fn(128, 128, |x, y| {
            let v = (x * 7919 + y * 104729) % 251;
            Rgb([v as u8, (v * 3 % 251) as u8, (v * 5 % 251) as u8])
        });
        let full = PngCodec.encode(&img, None).unwrap();
        let indexed = PngCodec.encode(&img, Some(32)).unwrap();
        assert!(indexed.len() < full.len());
    }
}
