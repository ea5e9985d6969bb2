//! Tonal and color enhancements by interpolation against a reference image.
//!
//! Every enhancement computes a reference ("degenerate") image from the
//! source and then blends:
//!
//! ```text
//! output = reference + factor * (source - reference)
//! ```
//!
//! per channel, rounded to the nearest integer and clamped to [0, 255].
//! A factor of 1.0 returns the source, 0.0 returns the reference, and values
//! outside [0, 1] extrapolate.
//!
//! ## References
//! - Brightness: black image
//! - Contrast: uniform image at the mean luminance
//! - Color: grayscale version of the source, in the source's mode
//! - Sharpness: the source after the smooth filter

use log::debug;
use serde::{Deserialize, Serialize};

use crate::buffer::{Color, PixelBuffer};
use crate::color::{convert, to_grayscale};
use crate::error::{RasterError, Result};
use crate::filter::{apply_preset, FilterPreset};

/// The enhancement to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enhancement {
    Brightness,
    Contrast,
    /// Saturation.
    #[serde(alias = "saturation")]
    Color,
    Sharpness,
}

/// Apply an enhancement with the given factor.
///
/// # Example
/// ```ignore
/// // 50% brighter
/// let bright = enhance(&image, Enhancement::Brightness, 1.5)?;
/// ```
pub fn enhance(image: &PixelBuffer, kind: Enhancement, factor: f32) -> Result<PixelBuffer> {
    debug!("enhance {:?} by {}", kind, factor);
    let reference = reference(image, kind)?;
    blend(&reference, image, factor)
}

pub fn brightness(image: &PixelBuffer, factor: f32) -> Result<PixelBuffer> {
    enhance(image, Enhancement::Brightness, factor)
}

pub fn contrast(image: &PixelBuffer, factor: f32) -> Result<PixelBuffer> {
    enhance(image, Enhancement::Contrast, factor)
}

pub fn color(image: &PixelBuffer, factor: f32) -> Result<PixelBuffer> {
    enhance(image, Enhancement::Color, factor)
}

pub fn sharpness(image: &PixelBuffer, factor: f32) -> Result<PixelBuffer> {
    enhance(image, Enhancement::Sharpness, factor)
}

/// Build the reference image an enhancement interpolates against.
pub fn reference(image: &PixelBuffer, kind: Enhancement) -> Result<PixelBuffer> {
    let (width, height) = image.dimensions();
    match kind {
        Enhancement::Brightness => PixelBuffer::new(width, height, image.mode()),
        Enhancement::Contrast => {
            let mean = mean_luminance(image)?;
            PixelBuffer::filled(width, height, image.mode(), Color::gray(mean))
        }
        Enhancement::Color => convert(&to_grayscale(image)?, image.mode()),
        Enhancement::Sharpness => Ok(apply_preset(image, FilterPreset::Smooth)),
    }
}

/// Interpolate between `reference` (factor 0) and `source` (factor 1).
///
/// # Errors
///
/// Returns `RasterError::DimensionMismatch` if the buffers differ in size,
/// and `RasterError::UnsupportedMode` if they differ in mode.
pub fn blend(reference: &PixelBuffer, source: &PixelBuffer, factor: f32) -> Result<PixelBuffer> {
    if reference.dimensions() != source.dimensions() {
        return Err(RasterError::DimensionMismatch {
            expected: source.dimensions(),
            actual: reference.dimensions(),
        });
    }
    if reference.mode() != source.mode() {
        return Err(RasterError::UnsupportedMode {
            expected: source.mode(),
            actual: reference.mode(),
        });
    }

    let mut output = source.clone();
    for (out, &r) in output.samples_mut().iter_mut().zip(reference.samples()) {
        let s = *out as f32;
        let r = r as f32;
        *out = (r + factor * (s - r)).clamp(0.0, 255.0).round() as u8;
    }
    Ok(output)
}

/// Mean luminance of the whole image, rounded to the nearest integer.
fn mean_luminance(image: &PixelBuffer) -> Result<u8> {
    let gray = to_grayscale(image)?;
    let total: u64 = gray.samples().iter().map(|&v| v as u64).sum();
    let mean = total as f64 / gray.pixel_count() as f64;
    Ok(mean.round().clamp(0.0, 255.0) as u8)
}
