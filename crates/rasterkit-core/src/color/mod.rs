//! Color mode conversion and per-pixel color remapping.

mod matrix;

pub use matrix::{apply_color_matrix, ColorMatrix};

use crate::buffer::{ColorMode, PixelBuffer};
use crate::error::Result;
use crate::luminance::luma_u8;

/// Convert to a single-channel luminance buffer.
///
/// Each output value is the BT.601 weighted sum of R, G and B, rounded to
/// the nearest integer. Grayscale input is returned as a copy.
pub fn to_grayscale(image: &PixelBuffer) -> Result<PixelBuffer> {
    match image.mode() {
        ColorMode::Grayscale => Ok(image.clone()),
        ColorMode::Rgb => {
            let samples = image
                .pixels()
                .map(|p| luma_u8(p[0], p[1], p[2]))
                .collect();
            PixelBuffer::from_raw(image.width(), image.height(), ColorMode::Grayscale, samples)
        }
    }
}

/// Broadcast a grayscale buffer to three identical channels.
///
/// RGB input is returned as a copy.
pub fn to_rgb(image: &PixelBuffer) -> Result<PixelBuffer> {
    match image.mode() {
        ColorMode::Rgb => Ok(image.clone()),
        ColorMode::Grayscale => {
            let samples = image.samples().iter().flat_map(|&v| [v, v, v]).collect();
            PixelBuffer::from_raw(image.width(), image.height(), ColorMode::Rgb, samples)
        }
    }
}

/// Convert to the requested mode.
pub fn convert(image: &PixelBuffer, mode: ColorMode) -> Result<PixelBuffer> {
    match mode {
        ColorMode::Grayscale => to_grayscale(image),
        ColorMode::Rgb => to_rgb(image),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Color;

    #[test]
    fn test_to_grayscale_uses_luminance() {
        let img = PixelBuffer::from_raw(
            3,
            1,
            ColorMode::Rgb,
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255],
        )
        .unwrap();
        let gray = to_grayscale(&img).unwrap();

        assert_eq!(gray.mode(), ColorMode::Grayscale);
        assert_eq!(gray.samples(), &[76, 150, 29]);
    }

    #[test]
    fn test_to_grayscale_of_gray_is_copy() {
        let img = PixelBuffer::filled(4, 4, ColorMode::Grayscale, Color::gray(42)).unwrap();
        assert_eq!(to_grayscale(&img).unwrap(), img);
    }

    #[test]
    fn test_to_rgb_broadcasts() {
        let img = PixelBuffer::from_raw(2, 1, ColorMode::Grayscale, vec![7, 250]).unwrap();
        let rgb = to_rgb(&img).unwrap();

        assert_eq!(rgb.mode(), ColorMode::Rgb);
        assert_eq!(rgb.samples(), &[7, 7, 7, 250, 250, 250]);
    }

    #[test]
    fn test_gray_round_trip_through_rgb() {
        let img = PixelBuffer::from_raw(3, 1, ColorMode::Grayscale, vec![0, 128, 255]).unwrap();
        let back = convert(&convert(&img, ColorMode::Rgb).unwrap(), ColorMode::Grayscale).unwrap();
        assert_eq!(back, img);
    }
}
