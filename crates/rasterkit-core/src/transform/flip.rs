//! Mirror an image along one axis.

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;

/// Axis to mirror across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipAxis {
    /// Mirror left to right (columns reversed).
    Horizontal,
    /// Mirror top to bottom (rows reversed).
    Vertical,
}

/// Mirror an image. Dimensions and mode are unchanged, and flipping twice
/// along the same axis returns the original pixels.
pub fn flip(image: &PixelBuffer, axis: FlipAxis) -> PixelBuffer {
    let channels = image.channels();
    let row_len = image.width() as usize * channels;
    let mut output = image.clone();

    match axis {
        FlipAxis::Horizontal => {
            for (dst_row, src_row) in output
                .samples_mut()
                .chunks_exact_mut(row_len)
                .zip(image.samples().chunks_exact(row_len))
            {
                for (dst, src) in dst_row
                    .chunks_exact_mut(channels)
                    .zip(src_row.chunks_exact(channels).rev())
                {
                    dst.copy_from_slice(src);
                }
            }
        }
        FlipAxis::Vertical => {
            for (dst_row, src_row) in output
                .samples_mut()
                .chunks_exact_mut(row_len)
                .zip(image.samples().chunks_exact(row_len).rev())
            {
                dst_row.copy_from_slice(src_row);
            }
        }
    }

    output
}
