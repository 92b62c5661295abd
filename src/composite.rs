//! Overlay a rendered rose on the map background.

use image::{buffer::ConvertBuffer, imageops, RgbImage, RgbaImage};

/// Horizontal shift of the rose, cancelling the margin the renderer leaves
/// left of its axes.
pub const ROSE_OFFSET_X: i64 = -10;

pub fn overlay(map: &RgbImage, rose: &RgbaImage) -> RgbImage {
    let mut canvas: RgbaImage = map.convert();
    imageops::overlay(&mut canvas, rose, ROSE_OFFSET_X, 0);

    canvas.convert()
}

#[cfg(test)]
mod tests {
    use image::{Rgb, Rgba};

    use super::*;

    #[test]
    fn should_keep_map_under_transparent_pixels() {
        let map = RgbImage::from_pixel(20, 10, Rgb([0, 128, 0]));
        let rose = RgbaImage::from_pixel(20, 10, Rgba([0, 0, 0, 0]));

        let out = overlay(&map, &rose);

        assert_eq!(out.dimensions(), (20, 10));
        assert!(out.pixels().all(|p| *p == Rgb([0, 128, 0])));
    }

    #[test]
    fn should_shift_rose_left() {
        let map = RgbImage::from_pixel(30, 10, Rgb([255, 255, 255]));
        let mut rose = RgbaImage::from_pixel(30, 10, Rgba([0, 0, 0, 0]));
        rose.put_pixel(15, 5, Rgba([255, 0, 0, 255]));

        let out = overlay(&map, &rose);

        assert_eq!(*out.get_pixel(5, 5), Rgb([255, 0, 0]));
        assert_eq!(*out.get_pixel(15, 5), Rgb([255, 255, 255]));
    }

    #[test]
    fn should_blend_partial_alpha() {
        let map = RgbImage::from_pixel(30, 1, Rgb([255, 255, 255]));
        let mut rose = RgbaImage::from_pixel(30, 1, Rgba([0, 0, 0, 0]));
        rose.put_pixel(20, 0, Rgba([0, 0, 0, 128]));

        let out = overlay(&map, &rose);
        let Rgb([r, g, b]) = *out.get_pixel(10, 0);

        assert!(r > 100 && r < 160);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }
}
