//! Monochrome film grain.
//!
//! One noise byte per pixel from a seeded RNG, composited at a constant alpha. The same seed and
//! image always produce the same output.

use image::{Rgb, RgbImage, RgbaImage};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

pub const DEFAULT_OPACITY: f64 = 0.035;
pub const DEFAULT_SEED: u64 = 42;

/// Grain alpha as an 8-bit value: `floor(255 * opacity)`.
pub fn grain_alpha(opacity: f64) -> u8 {
    (255.0 * opacity.clamp(0.0, 1.0)).floor() as u8
}

/// Composites grain over `img` and flattens the result to opaque RGB.
pub fn add_grain(img: &RgbaImage, opacity: f64, seed: u64) -> RgbImage {
    let (w, h) = img.dimensions();
    let mut noise = vec![0u8; w as usize * h as usize];
    StdRng::seed_from_u64(seed).fill_bytes(&mut noise);

    let alpha = f32::from(grain_alpha(opacity)) / 255.0;
    let mut out = RgbImage::new(w, h);
    for ((dst, src), n) in out.pixels_mut().zip(img.pixels()).zip(noise) {
        let [r, g, b, a] = src.0;
        // Source-over of the noise layer onto the (possibly translucent) image, then flattened.
        let base_a = f32::from(a) / 255.0;
        let out_a = alpha + base_a * (1.0 - alpha);
        let blend = |c: u8| -> u8 {
            if out_a <= 0.0 {
                return 0;
            }
            let v = (f32::from(n) * alpha + f32::from(c) * base_a * (1.0 - alpha)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        *dst = Rgb([blend(r), blend(g), blend(b)]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn default_alpha_is_eight() {
        assert_eq!(grain_alpha(DEFAULT_OPACITY), 8);
        assert_eq!(grain_alpha(0.0), 0);
        assert_eq!(grain_alpha(1.0), 255);
    }

    #[test]
    fn same_seed_same_pixels() {
        let img = solid(64, 32, [10, 10, 10]);
        let a = add_grain(&img, DEFAULT_OPACITY, DEFAULT_SEED);
        let b = add_grain(&img, DEFAULT_OPACITY, DEFAULT_SEED);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn different_seed_different_pixels() {
        let img = solid(64, 32, [10, 10, 10]);
        let a = add_grain(&img, 0.5, 1);
        let b = add_grain(&img, 0.5, 2);
        assert_ne!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn zero_opacity_is_identity_on_opaque_images() {
        let img = solid(8, 8, [200, 100, 50]);
        let out = add_grain(&img, 0.0, DEFAULT_SEED);
        assert!(out.pixels().all(|p| p.0 == [200, 100, 50]));
    }

    #[test]
    fn subtle_grain_stays_close_to_the_base() {
        let img = solid(32, 32, [10, 10, 10]);
        let out = add_grain(&img, DEFAULT_OPACITY, DEFAULT_SEED);
        // alpha 8/255 moves a channel by at most ~8 levels
        assert!(out.pixels().all(|p| p.0.iter().all(|c| (*c as i32 - 10).abs() <= 8)));
        assert!(out.pixels().all(|p| p.0[0] == p.0[1] && p.0[1] == p.0[2]));
    }
}
