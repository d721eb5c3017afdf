//! Pure region geometry and PNG encoding.
//!
//! This module has zero infrastructure dependencies.
//! It takes pixel data in, returns pixel data out.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Rectangle drawn by the user on the overlay, in logical (CSS) pixels
/// relative to the top-left corner of the captured display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Rectangle in physical pixels of the captured bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Converts the logical rectangle to bitmap pixels and clamps it to
    /// the bitmap. Negative widths/heights (drawn right-to-left) are
    /// normalised first. Returns `None` if nothing is left after clamping.
    pub fn to_pixels(&self, scale_factor: f64, img_width: u32, img_height: u32) -> Option<PixelRect> {
        let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };

        let (left, right) = ordered(self.x, self.x + self.width);
        let (top, bottom) = ordered(self.y, self.y + self.height);

        let x0 = (left * scale).round().clamp(0.0, img_width as f64) as u32;
        let y0 = (top * scale).round().clamp(0.0, img_height as f64) as u32;
        let x1 = (right * scale).round().clamp(0.0, img_width as f64) as u32;
        let y1 = (bottom * scale).round().clamp(0.0, img_height as f64) as u32;

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Crops a `DynamicImage` to the specified pixel rectangle and returns PNG bytes.
pub fn crop_to_png_bytes(image: &DynamicImage, rect: PixelRect) -> Result<Vec<u8>, CropError> {
    if rect.width == 0 || rect.height == 0 {
        return Err(CropError::ZeroDimension);
    }

    let (img_width, img_height) = (image.width(), image.height());

    if rect.x + rect.width > img_width || rect.y + rect.height > img_height {
        return Err(CropError::OutOfBounds {
            requested: (rect.x, rect.y, rect.width, rect.height),
            image_size: (img_width, img_height),
        });
    }

    let cropped = image.crop_imm(rect.x, rect.y, rect.width, rect.height);
    encode_png(&cropped)
}

/// Encodes an image as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, CropError> {
    let mut png_bytes: Vec<u8> = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| CropError::EncodingFailed(e.to_string()))?;
    Ok(png_bytes)
}

/// Wraps PNG bytes in a `data:` URL, the form the webview and the backend
/// both expect.
pub fn png_data_url(png_bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png_bytes))
}

/// Encodes an image straight to a PNG `data:` URL.
pub fn encode_png_data_url(image: &DynamicImage) -> Result<String, CropError> {
    encode_png(image).map(|bytes| png_data_url(&bytes))
}

#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("Crop rectangle has zero width or height")]
    ZeroDimension,

    #[error(
        "Crop rectangle ({},{},{},{}) exceeds image bounds ({}x{})",
        requested.0, requested.1, requested.2, requested.3,
        image_size.0, image_size.1
    )]
    OutOfBounds {
        requested: (u32, u32, u32, u32),
        image_size: (u32, u32),
    },

    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}
