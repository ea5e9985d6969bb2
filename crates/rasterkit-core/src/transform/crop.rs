//! Image cropping by pixel box.
//!
//! # Coordinate System
//!
//! - `(left, top)` is the first pixel included
//! - `(right, bottom)` is exclusive, so the output is
//!   `(right - left) x (bottom - top)`
//!
//! # Example
//!
//! ```ignore
//! // Crop the centered half of a 400x300 image
//! let cropped = crop(&image, 100, 75, 300, 225)?;
//! ```

use crate::buffer::PixelBuffer;
use crate::error::{RasterError, Result};

/// Extract a sub-grid of the image.
///
/// # Arguments
///
/// * `image` - Source image to crop
/// * `left`, `top` - First column and row included
/// * `right`, `bottom` - First column and row excluded
///
/// # Errors
///
/// Returns `RasterError::InvalidRegion` if the box is empty or extends past
/// the source bounds.
pub fn crop(image: &PixelBuffer, left: u32, top: u32, right: u32, bottom: u32) -> Result<PixelBuffer> {
    let (width, height) = image.dimensions();
    if right <= left || bottom <= top || right > width || bottom > height {
        return Err(RasterError::InvalidRegion {
            left,
            top,
            right,
            bottom,
            width,
            height,
        });
    }

    // Fast path: full crop returns a clone
    if left == 0 && top == 0 && right == width && bottom == height {
        return Ok(image.clone());
    }

    let channels = image.channels();
    let out_width = right - left;
    let out_height = bottom - top;
    let src_row_len = width as usize * channels;
    let span = left as usize * channels..right as usize * channels;

    // Copy pixel data row by row
    let mut output = Vec::with_capacity(out_width as usize * out_height as usize * channels);
    for row in image
        .samples()
        .chunks_exact(src_row_len)
        .skip(top as usize)
        .take(out_height as usize)
    {
        output.extend_from_slice(&row[span.clone()]);
    }

    PixelBuffer::from_raw(out_width, out_height, image.mode(), output)
}

/// Crop a centered region covering `fraction` of each dimension.
///
/// A fraction of 0.5 keeps the middle half in each direction, i.e. the box
/// from `width / 4` to `3 * width / 4`.
///
/// # Errors
///
/// Returns `RasterError::InvalidRegion` unless `0 < fraction <= 1`.
pub fn crop_center(image: &PixelBuffer, fraction: f64) -> Result<PixelBuffer> {
    let (width, height) = image.dimensions();
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(RasterError::InvalidRegion {
            left: 0,
            top: 0,
            right: 0,
            bottom: 0,
            width,
            height,
        });
    }

    let out_w = ((width as f64 * fraction).round() as u32).clamp(1, width);
    let out_h = ((height as f64 * fraction).round() as u32).clamp(1, height);
    let left = (width - out_w) / 2;
    let top = (height - out_h) / 2;

    crop(image, left, top, left + out_w, top + out_h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ColorMode;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                // Use position to create unique pixel values
                let v = ((y * width + x) % 256) as u8;
                pixels.push(v); // R
                pixels.push(v); // G
                pixels.push(v); // B
            }
        }
        PixelBuffer::from_raw(width, height, ColorMode::Rgb, pixels).unwrap()
    }

    #[test]
    fn test_full_crop() {
        let img = test_image(100, 100);
        let result = crop(&img, 0, 0, 100, 100).unwrap();

        assert_eq!(result, img);
    }

    #[test]
    fn test_half_crop() {
        let img = test_image(100, 100);
        let result = crop(&img, 0, 0, 50, 50).unwrap();

        assert_eq!(result.dimensions(), (50, 50));
    }

    #[test]
    fn test_crop_pixel_values_preserved() {
        let img = test_image(10, 10);
        let result = crop(&img, 3, 3, 7, 7).unwrap();

        // First pixel should be from (3, 3)
        // Value = (3 * 10 + 3) % 256 = 33
        assert_eq!(result.get(0, 0).unwrap(), &[33, 33, 33]);
        // Last pixel should be from (6, 6) = 66
        assert_eq!(result.get(3, 3).unwrap(), &[66, 66, 66]);
    }

    #[test]
    fn test_crop_rectangular() {
        let img = test_image(200, 100);
        let result = crop(&img, 0, 0, 50, 100).unwrap();

        assert_eq!(result.dimensions(), (50, 100));
    }

    #[test]
    fn test_crop_empty_box_rejected() {
        let img = test_image(10, 10);

        assert!(matches!(
            crop(&img, 5, 5, 5, 8),
            Err(RasterError::InvalidRegion { .. })
        ));
        assert!(crop(&img, 5, 5, 8, 5).is_err());
        assert!(crop(&img, 6, 0, 4, 10).is_err());
    }

    #[test]
    fn test_crop_out_of_bounds_rejected() {
        let img = test_image(10, 10);

        assert!(crop(&img, 0, 0, 11, 10).is_err());
        assert!(crop(&img, 8, 8, 12, 12).is_err());
    }

    #[test]
    fn test_single_pixel_crop() {
        let img = test_image(10, 10);
        let result = crop(&img, 9, 9, 10, 10).unwrap();

        assert_eq!(result.dimensions(), (1, 1));
        assert_eq!(result.samples(), &[99, 99, 99]);
    }

    #[test]
    fn test_crop_center_quarter() {
        let img = test_image(400, 300);
        let result = crop_center(&img, 0.5).unwrap();

        assert_eq!(result.dimensions(), (200, 150));
        // Starts at (100, 75)
        let expected = ((75 * 400 + 100) % 256) as u8;
        assert_eq!(result.get(0, 0).unwrap()[0], expected);
    }

    #[test]
    fn test_crop_center_rejects_bad_fraction() {
        let img = test_image(10, 10);

        assert!(crop_center(&img, 0.0).is_err());
        assert!(crop_center(&img, 1.5).is_err());
        assert!(crop_center(&img, f64::NAN).is_err());
        assert_eq!(crop_center(&img, 1.0).unwrap(), img);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
