//! Synthetic image builders for testing.

// Allow common image code patterns
#![allow(clippy::cast_possible_truncation)]

use std::io::Cursor;

use image::{
    DynamicImage, GrayAlphaImage, GrayImage, ImageBuffer, ImageFormat, Luma, LumaA, Rgb, RgbImage,
    Rgba, RgbaImage,
};
use plantdx_core::LeafImage;

/// Builder for creating synthetic leaf images in every supported color mode.
pub struct SyntheticLeafBuilder;

impl SyntheticLeafBuilder {
    // === Solid colors ===

    /// Creates a solid RGB image.
    #[must_use]
    pub fn solid_rgb(width: u32, height: u32, color: [u8; 3]) -> LeafImage {
        let img = RgbImage::from_pixel(width, height, Rgb(color));
        LeafImage::new("synthetic://solid_rgb", DynamicImage::ImageRgb8(img))
    }

    /// Creates a solid RGBA image.
    #[must_use]
    pub fn solid_rgba(width: u32, height: u32, color: [u8; 4]) -> LeafImage {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        LeafImage::new("synthetic://solid_rgba", DynamicImage::ImageRgba8(img))
    }

    /// Creates a solid grayscale image.
    #[must_use]
    pub fn solid_gray(width: u32, height: u32, value: u8) -> LeafImage {
        let img = GrayImage::from_pixel(width, height, Luma([value]));
        LeafImage::new("synthetic://solid_gray", DynamicImage::ImageLuma8(img))
    }

    /// Creates a solid grayscale image with an alpha channel.
    #[must_use]
    pub fn solid_gray_alpha(width: u32, height: u32, value: u8, alpha: u8) -> LeafImage {
        let img = GrayAlphaImage::from_pixel(width, height, LumaA([value, alpha]));
        LeafImage::new(
            "synthetic://solid_gray_alpha",
            DynamicImage::ImageLumaA8(img),
        )
    }

    // === Patterns ===

    /// Creates a leaf-like pattern: green background with brown spots.
    #[must_use]
    pub fn spotted_leaf(width: u32, height: u32) -> LeafImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            if (x / 16 + y / 16) % 5 == 0 {
                Rgb([120, 70, 20])
            } else {
                Rgb([40, 160, 60])
            }
        });
        LeafImage::new("synthetic://spotted_leaf", DynamicImage::ImageRgb8(img))
    }

    /// Creates a horizontal RGB gradient covering the full value range.
    #[must_use]
    pub fn gradient_rgb(width: u32, height: u32) -> LeafImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            let r = ((u32::from(u8::MAX) * x) / width.max(1)) as u8;
            let g = ((u32::from(u8::MAX) * y) / height.max(1)) as u8;
            Rgb([r, g, 255 - r])
        });
        LeafImage::new("synthetic://gradient_rgb", DynamicImage::ImageRgb8(img))
    }

    /// Creates a 16-bit RGB gradient (e.g. from a high bit-depth PNG).
    #[must_use]
    pub fn gradient_rgb16(width: u32, height: u32) -> LeafImage {
        let img: ImageBuffer<Rgb<u16>, Vec<u16>> = ImageBuffer::from_fn(width, height, |x, _| {
            let v = ((u32::from(u16::MAX) * x) / width.max(1)) as u16;
            Rgb([v, u16::MAX - v, v / 2])
        });
        LeafImage::new("synthetic://gradient_rgb16", DynamicImage::ImageRgb16(img))
    }

    // === Encoded ===

    /// Encodes an image in the given format.
    ///
    /// # Panics
    ///
    /// Panics if encoding fails, which only happens for unsupported
    /// color mode and format combinations.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn encode(leaf: &LeafImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        leaf.image
            .write_to(&mut Cursor::new(&mut bytes), format)
            .expect("encode synthetic image");
        bytes
    }
}
