//! Channel split and merge.

use crate::buffer::{ColorMode, PixelBuffer};
use crate::error::{RasterError, Result};

/// Split an RGB buffer into red, green and blue grayscale buffers.
///
/// # Errors
///
/// Returns `RasterError::UnsupportedMode` unless the buffer is RGB.
pub fn split_channels(image: &PixelBuffer) -> Result<[PixelBuffer; 3]> {
    if image.mode() != ColorMode::Rgb {
        return Err(RasterError::UnsupportedMode {
            expected: ColorMode::Rgb,
            actual: image.mode(),
        });
    }

    let (width, height) = image.dimensions();
    let mut planes: [Vec<u8>; 3] = Default::default();
    for plane in planes.iter_mut() {
        plane.reserve_exact(image.pixel_count());
    }
    for px in image.pixels() {
        for (plane, &v) in planes.iter_mut().zip(px) {
            plane.push(v);
        }
    }

    let [r, g, b] = planes;
    Ok([
        PixelBuffer::from_raw(width, height, ColorMode::Grayscale, r)?,
        PixelBuffer::from_raw(width, height, ColorMode::Grayscale, g)?,
        PixelBuffer::from_raw(width, height, ColorMode::Grayscale, b)?,
    ])
}

/// Merge three grayscale buffers into one RGB buffer, in argument order.
///
/// # Errors
///
/// Returns `RasterError::UnsupportedMode` if any input is not grayscale and
/// `RasterError::DimensionMismatch` if the inputs differ in size.
pub fn merge_channels(r: &PixelBuffer, g: &PixelBuffer, b: &PixelBuffer) -> Result<PixelBuffer> {
    for plane in [r, g, b] {
        if plane.mode() != ColorMode::Grayscale {
            return Err(RasterError::UnsupportedMode {
                expected: ColorMode::Grayscale,
                actual: plane.mode(),
            });
        }
        if plane.dimensions() != r.dimensions() {
            return Err(RasterError::DimensionMismatch {
                expected: r.dimensions(),
                actual: plane.dimensions(),
            });
        }
    }

    let samples = r
        .samples()
        .iter()
        .zip(g.samples())
        .zip(b.samples())
        .flat_map(|((&r, &g), &b)| [r, g, b])
        .collect();

    PixelBuffer::from_raw(r.width(), r.height(), ColorMode::Rgb, samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rgb() -> PixelBuffer {
        PixelBuffer::from_raw(2, 1, ColorMode::Rgb, vec![1, 2, 3, 4, 5, 6]).unwrap()
    }

    #[test]
    fn test_split_planes() {
        let [r, g, b] = split_channels(&sample_rgb()).unwrap();
        assert_eq!(r.samples(), &[1, 4]);
        assert_eq!(g.samples(), &[2, 5]);
        assert_eq!(b.samples(), &[3, 6]);
        assert_eq!(r.mode(), ColorMode::Grayscale);
        assert_eq!(r.dimensions(), (2, 1));
    }

    #[test]
    fn test_false_color_reorder() {
        let [r, g, b] = split_channels(&sample_rgb()).unwrap();
        let swapped = merge_channels(&g, &b, &r).unwrap();
        assert_eq!(swapped.samples(), &[2, 3, 1, 5, 6, 4]);
    }

    #[test]
    fn test_split_requires_rgb() {
        let gray = PixelBuffer::new(2, 2, ColorMode::Grayscale).unwrap();
        assert!(matches!(
            split_channels(&gray),
            Err(RasterError::UnsupportedMode { .. })
        ));
    }

    #[test]
    fn test_merge_dimension_mismatch() {
        let a = PixelBuffer::new(2, 2, ColorMode::Grayscale).unwrap();
        let b = PixelBuffer::new(2, 3, ColorMode::Grayscale).unwrap();
        assert_eq!(
            merge_channels(&a, &a, &b),
            Err(RasterError::DimensionMismatch {
                expected: (2, 2),
                actual: (2, 3)
            })
        );
    }

    #[test]
    fn test_merge_requires_grayscale() {
        let gray = PixelBuffer::new(2, 1, ColorMode::Grayscale).unwrap();
        assert!(matches!(
            merge_channels(&gray, &sample_rgb(), &gray),
            Err(RasterError::UnsupportedMode { .. })
        ));
    }
}
