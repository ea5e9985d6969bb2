//! Aspect-preserving thumbnails.
//!
//! The thumbnail is the largest downscale of the source that fits inside a
//! bounding box. Sources already inside the box are returned unchanged, so a
//! thumbnail is never larger than its source.

use log::debug;

use crate::buffer::PixelBuffer;
use crate::error::{RasterError, Result};
use crate::transform::{resize, Resampling};

/// Downscale `image` to fit within `max_width` x `max_height`.
///
/// # Arguments
///
/// * `image` - Source image
/// * `max_width`, `max_height` - Bounding box in pixels
/// * `resampling` - Filter passed through to [`resize`]
///
/// # Errors
///
/// Returns `RasterError::InvalidDimension` if either box dimension is zero.
pub fn thumbnail(
    image: &PixelBuffer,
    max_width: u32,
    max_height: u32,
    resampling: Resampling,
) -> Result<PixelBuffer> {
    let (width, height) = thumbnail_size(image.width(), image.height(), max_width, max_height)?;
    debug!(
        "thumbnail {}x{} into {}x{} -> {}x{}",
        image.width(),
        image.height(),
        max_width,
        max_height,
        width,
        height
    );
    resize(image, width, height, resampling)
}

/// Dimensions of the thumbnail of a `width` x `height` source.
///
/// The scale is `min(1, max_width / width, max_height / height)`; scaled
/// dimensions are rounded and kept between 1 and the smaller of the source
/// and box extents.
pub fn thumbnail_size(width: u32, height: u32, max_width: u32, max_height: u32) -> Result<(u32, u32)> {
    if max_width == 0 || max_height == 0 {
        return Err(RasterError::InvalidDimension {
            width: max_width,
            height: max_height,
        });
    }
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidDimension { width, height });
    }

    let scale = (max_width as f64 / width as f64)
        .min(max_height as f64 / height as f64)
        .min(1.0);

    let fit = |extent: u32, limit: u32| -> u32 {
        ((extent as f64 * scale).round() as u32).clamp(1, extent.min(limit))
    };

    Ok((fit(width, max_width), fit(height, max_height)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ColorMode;

    #[test]
    fn test_landscape_into_square() {
        assert_eq!(thumbnail_size(400, 300, 128, 128).unwrap(), (128, 96));
        assert_eq!(thumbnail_size(400, 300, 64, 64).unwrap(), (64, 48));
        assert_eq!(thumbnail_size(400, 300, 32, 32).unwrap(), (32, 24));
    }

    #[test]
    fn test_portrait_into_square() {
        assert_eq!(thumbnail_size(300, 400, 128, 128).unwrap(), (96, 128));
    }

    #[test]
    fn test_never_upscales() {
        assert_eq!(thumbnail_size(100, 50, 128, 128).unwrap(), (100, 50));
    }

    #[test]
    fn test_extreme_aspect_keeps_one_pixel() {
        assert_eq!(thumbnail_size(10000, 10, 100, 100).unwrap(), (100, 1));
    }

    #[test]
    fn test_zero_box_rejected() {
        assert!(matches!(
            thumbnail_size(400, 300, 0, 128),
            Err(RasterError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_thumbnail_buffer() {
        let img = PixelBuffer::new(400, 300, ColorMode::Rgb).unwrap();
        let thumb = thumbnail(&img, 128, 128, Resampling::Lanczos3).unwrap();

        assert_eq!(thumb.dimensions(), (128, 96));
        assert_eq!(thumb.mode(), ColorMode::Rgb);
    }

    #[test]
    fn test_small_source_returned_as_is() {
        let img = PixelBuffer::new(20, 10, ColorMode::Grayscale).unwrap();
        assert_eq!(thumbnail(&img, 128, 128, Resampling::Bilinear).unwrap(), img);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
