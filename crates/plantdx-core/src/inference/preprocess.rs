//! Image to tensor conversion.
//!
//! The steps and their order are fixed; changing either changes the
//! model's confidence scores.

// Allow common image code patterns
#![allow(clippy::cast_possible_truncation)]

use candle_core::{Device, Tensor};
use image::imageops::FilterType;
use image::DynamicImage;
use tracing::debug;

use crate::domain::LeafImage;
use crate::error::{Error, Result};

/// Model input width in pixels.
pub const INPUT_WIDTH: u32 = 224;
/// Model input height in pixels.
pub const INPUT_HEIGHT: u32 = 224;

/// Resampling filter used for resizing (bicubic).
pub const RESAMPLE_FILTER: FilterType = FilterType::CatmullRom;

/// Decodes an encoded image (PNG, JPEG) from memory.
///
/// # Errors
///
/// Returns `Error::ImageDecode` if the bytes are not a supported image.
pub fn decode_image(name: impl Into<String>, bytes: &[u8]) -> Result<LeafImage> {
    let name = name.into();
    let image = image::load_from_memory(bytes)
        .map_err(|e| Error::ImageDecode(format!("{name}: {e}")))?;
    Ok(LeafImage::new(name, image))
}

/// Converts an image into a `(1, height, width, 3)` float32 tensor in `[0, 1]`.
///
/// Steps, in order:
/// 1. convert to 8-bit RGB (alpha dropped, grayscale expanded)
/// 2. resize to exactly `width x height` with [`RESAMPLE_FILTER`]
/// 3. scale each channel by `1 / 255`
/// 4. add a leading batch dimension
///
/// # Errors
///
/// Returns `Error::Inference` if the target size is zero or the tensor
/// cannot be built.
pub fn preprocess(image: &DynamicImage, (width, height): (u32, u32)) -> Result<Tensor> {
    if width == 0 || height == 0 {
        return Err(Error::Inference(format!(
            "invalid preprocessing target size {width}x{height}"
        )));
    }

    let rgb = image.to_rgb8();
    let resized = image::imageops::resize(&rgb, width, height, RESAMPLE_FILTER);
    debug!(
        "Preprocessed {}x{} image to {width}x{height}",
        image.width(),
        image.height()
    );

    // Row-major RGB bytes are already NHWC order
    let data: Vec<f32> = resized
        .into_raw()
        .into_iter()
        .map(|v| f32::from(v) / 255.0)
        .collect();

    Ok(Tensor::from_vec(
        data,
        (1, height as usize, width as usize, 3),
        &Device::Cpu,
    )?)
}

/// Preprocesses to the default 224x224 model input.
///
/// # Errors
///
/// See [`preprocess`].
pub fn preprocess_default(image: &DynamicImage) -> Result<Tensor> {
    preprocess(image, (INPUT_WIDTH, INPUT_HEIGHT))
}
