//! QR code rendering for product links.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use tracing::debug;

use super::validate_url;
use crate::error::{Error, Result};

/// QR rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrOptions {
    /// Minimum width and height of the PNG in pixels, quiet zone included.
    pub min_size: u32,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self { min_size: 150 }
    }
}

/// Renders a URL as a PNG QR code with default options.
///
/// # Errors
///
/// See [`render_qr_with`].
pub fn render_qr(url: &str) -> Result<Vec<u8>> {
    render_qr_with(url, &QrOptions::default())
}

/// Renders a URL as a grayscale PNG QR code.
///
/// The encoding is deterministic: the same URL and options always yield
/// the same bytes.
///
/// # Errors
///
/// Returns `Error::InvalidUrl` if the URL is empty, not absolute http(s),
/// or too long to encode, and `Error::Report` if PNG encoding fails.
pub fn render_qr_with(url: &str, options: &QrOptions) -> Result<Vec<u8>> {
    validate_url(url)?;

    let code = QrCode::new(url.as_bytes()).map_err(|e| Error::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(options.min_size, options.min_size)
        .build();

    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| Error::Report(format!("failed to encode QR PNG: {e}")))?;

    debug!("Rendered QR code for {url} ({} bytes)", bytes.len());
    Ok(bytes)
}
