//! Linear color-matrix transforms.
//!
//! A [`ColorMatrix`] maps `(R, G, B)` to `(R', G', B')`:
//!
//! ```text
//! R' = m[0][0]*R + m[0][1]*G + m[0][2]*B + m[0][3]
//! G' = m[1][0]*R + m[1][1]*G + m[1][2]*B + m[1][3]
//! B' = m[2][0]*R + m[2][1]*G + m[2][2]*B + m[2][3]
//! ```
//!
//! Results are rounded to the nearest integer and clamped to [0, 255].

use serde::{Deserialize, Serialize};

use crate::buffer::{ColorMode, PixelBuffer};
use crate::error::{RasterError, Result};

/// A 3x3 color matrix with a bias column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "MatrixRows", into = "MatrixRows")]
pub struct ColorMatrix {
    rows: [[f32; 4]; 3],
}

impl ColorMatrix {
    /// Matrix without bias.
    pub fn new(weights: [[f32; 3]; 3]) -> Self {
        let mut rows = [[0.0; 4]; 3];
        for (row, w) in rows.iter_mut().zip(weights) {
            row[..3].copy_from_slice(&w);
        }
        Self { rows }
    }

    /// Matrix whose fourth column is an additive bias.
    pub fn with_bias(rows: [[f32; 4]; 3]) -> Self {
        Self { rows }
    }

    pub fn identity() -> Self {
        Self::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// The classic sepia tone.
    pub fn sepia() -> Self {
        Self::new([
            [0.393, 0.769, 0.189],
            [0.349, 0.686, 0.168],
            [0.272, 0.534, 0.131],
        ])
    }

    pub fn rows(&self) -> &[[f32; 4]; 3] {
        &self.rows
    }

    #[inline]
    fn transform(&self, rgb: [f32; 3]) -> [u8; 3] {
        let mut out = [0u8; 3];
        for (o, row) in out.iter_mut().zip(&self.rows) {
            let v = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2] + row[3];
            *o = v.clamp(0.0, 255.0).round() as u8;
        }
        out
    }
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

/// Config form: either three rows of three weights or three rows of four.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum MatrixRows {
    Plain([[f32; 3]; 3]),
    Biased([[f32; 4]; 3]),
}

impl From<MatrixRows> for ColorMatrix {
    fn from(rows: MatrixRows) -> Self {
        match rows {
            MatrixRows::Plain(w) => ColorMatrix::new(w),
            MatrixRows::Biased(r) => ColorMatrix::with_bias(r),
        }
    }
}

impl From<ColorMatrix> for MatrixRows {
    fn from(matrix: ColorMatrix) -> Self {
        MatrixRows::Biased(matrix.rows)
    }
}

/// Apply a color matrix to every pixel.
///
/// # Errors
///
/// Returns `RasterError::UnsupportedMode` unless the buffer is RGB.
pub fn apply_color_matrix(image: &PixelBuffer, matrix: &ColorMatrix) -> Result<PixelBuffer> {
    if image.mode() != ColorMode::Rgb {
        return Err(RasterError::UnsupportedMode {
            expected: ColorMode::Rgb,
            actual: image.mode(),
        });
    }

    let mut output = image.clone();
    for px in output.samples_mut().chunks_exact_mut(3) {
        let mapped = matrix.transform([px[0] as f32, px[1] as f32, px[2] as f32]);
        px.copy_from_slice(&mapped);
    }
    Ok(output)
}
