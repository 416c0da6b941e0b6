// THEORY:
// The `image_loader` is the input-boundary collaborator: it turns arbitrary
// encoded image bytes (JPEG/PNG/whatever the `image` crate decodes) into the
// one shape the core understands, a 224x224 RGB `PixelBuffer`. Decoding and
// resizing are the only fallible steps in the whole system, so this is also
// the only module with an error type; once a `PixelBuffer` exists, everything
// downstream is total.

use crate::core_modules::pixel_buffer::pixel_buffer::{
    ANALYSIS_HEIGHT, ANALYSIS_WIDTH, PixelBuffer,
};
use image::imageops::FilterType;
use std::path::Path;
use thiserror::Error;

/// Failures at the decode/resize boundary.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The bytes were not a decodable image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    /// The resized image did not produce the expected buffer shape. Indicates
    /// a bug in the resize step, not bad user input.
    #[error("resized image has unexpected shape")]
    UnexpectedShape,
}

/// Decodes encoded image bytes and resizes to the analysis resolution.
pub fn load_from_memory(bytes: &[u8]) -> Result<PixelBuffer, LoadError> {
    let decoded = image::load_from_memory(bytes)?;
    let resized = decoded
        .resize_exact(ANALYSIS_WIDTH, ANALYSIS_HEIGHT, FilterType::Triangle)
        .to_rgb8();
    PixelBuffer::from_rgb_bytes(ANALYSIS_WIDTH, ANALYSIS_HEIGHT, resized.as_raw())
        .ok_or(LoadError::UnexpectedShape)
}

/// Decodes an image file and resizes to the analysis resolution.
pub fn load_from_path(path: &Path) -> Result<PixelBuffer, LoadError> {
    let decoded = image::open(path)?;
    let resized = decoded
        .resize_exact(ANALYSIS_WIDTH, ANALYSIS_HEIGHT, FilterType::Triangle)
        .to_rgb8();
    PixelBuffer::from_rgb_bytes(ANALYSIS_WIDTH, ANALYSIS_HEIGHT, resized.as_raw())
        .ok_or(LoadError::UnexpectedShape)
}
