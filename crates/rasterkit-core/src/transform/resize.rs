//! Exact-size resampling.
//!
//! Pixel interpolation is delegated to the `image` crate's resize filters.
//! The input is never modified.

use log::debug;

use super::Resampling;
use crate::buffer::PixelBuffer;
use crate::error::{RasterError, Result};

/// Resize an image to exact dimensions.
///
/// # Arguments
///
/// * `image` - The source image to resize
/// * `width` - Target width in pixels
/// * `height` - Target height in pixels
/// * `resampling` - Interpolation filter to use
///
/// # Returns
///
/// A new `PixelBuffer` of exactly `width` x `height` in the source's mode.
///
/// # Errors
///
/// Returns `RasterError::InvalidDimension` if either target dimension is zero.
pub fn resize(
    image: &PixelBuffer,
    width: u32,
    height: u32,
    resampling: Resampling,
) -> Result<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidDimension { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }

    debug!(
        "resize {}x{} -> {}x{} ({:?})",
        image.width(),
        image.height(),
        width,
        height,
        resampling
    );

    let dynamic = image
        .to_dynamic()
        .ok_or_else(|| RasterError::Io("failed to view buffer as an image".to_string()))?;
    let resized = dynamic.resize_exact(width, height, resampling.to_image_filter());

    PixelBuffer::from_dynamic(resized)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::buffer::ColorMode;
    use proptest::prelude::*;

    /// Strategy for generating image dimensions (keep small for speed).
    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=40, 1u32..=40)
    }

    proptest! {
        /// Property: resizing away and back restores the original dimensions.
        #[test]
        fn prop_dimension_round_trip(
            (width, height) in dimensions_strategy(),
            (w2, h2) in dimensions_strategy(),
        ) {
            let img = PixelBuffer::new(width, height, ColorMode::Rgb).unwrap();
            let there = resize(&img, w2, h2, Resampling::Bilinear).unwrap();
            let back = resize(&there, width, height, Resampling::Bilinear).unwrap();

            prop_assert_eq!(there.dimensions(), (w2, h2));
            prop_assert_eq!(back.dimensions(), (width, height));
        }
    }
}
