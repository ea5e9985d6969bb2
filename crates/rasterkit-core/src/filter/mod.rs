//! Fixed-kernel convolution filters.
//!
//! The engine is generic over any [`Kernel`]. Named presets (blur, sharpen,
//! emboss, ...) are just kernel/divisor/offset triples fed to the same
//! convolution.
//!
//! ## Algorithm
//!
//! For every output sample the kernel footprint is centered on the pixel and
//! each weight multiplies the matching neighbor in the same channel.
//! Neighbors that fall outside the image replicate the nearest edge pixel.
//! The sum is divided by the divisor, the offset is added, and the result is
//! rounded half away from zero and clamped to [0, 255]. Sums are accumulated
//! in 64 bits and saturate, so extreme weights clamp instead of wrapping.

mod kernel;

use log::debug;

pub use kernel::{FilterPreset, Kernel, KernelSpec};

use crate::buffer::PixelBuffer;

/// Convolve every channel of `image` with `kernel`.
///
/// The output has the same dimensions and mode as the input.
pub fn apply_kernel(image: &PixelBuffer, kernel: &Kernel) -> PixelBuffer {
    let (width, height) = image.dimensions();
    let channels = image.channels();
    let (kw, kh) = (kernel.width() as i64, kernel.height() as i64);
    let (rx, ry) = (kw / 2, kh / 2);
    let divisor = kernel.divisor() as f64;
    let offset = kernel.offset() as f64;
    let weights = kernel.weights();
    let src = image.samples();
    let row_len = width as usize * channels;

    debug!(
        "convolve {}x{} with {}x{} kernel",
        width,
        height,
        kernel.width(),
        kernel.height()
    );

    // Replicated-border column offsets per kernel column, computed once per x
    let clamp_col = |x: i64| x.clamp(0, width as i64 - 1) as usize * channels;
    let clamp_row = |y: i64| y.clamp(0, height as i64 - 1) as usize * row_len;

    let mut output = image.clone();
    // A single product always fits in i64; the running sum saturates
    let mut sums = [0i64; 3];
    let mut columns = vec![0usize; kw as usize];

    for y in 0..height as i64 {
        let dst_row = y as usize * row_len;
        for x in 0..width as i64 {
            for (k, col) in columns.iter_mut().enumerate() {
                *col = clamp_col(x + k as i64 - rx);
            }

            sums.fill(0);
            for ky in 0..kh {
                let row = clamp_row(y + ky - ry);
                let weight_row = &weights[(ky * kw) as usize..((ky + 1) * kw) as usize];
                for (&weight, &col) in weight_row.iter().zip(columns.iter()) {
                    if weight == 0 {
                        continue;
                    }
                    let base = row + col;
                    for (c, sum) in sums[..channels].iter_mut().enumerate() {
                        *sum = sum.saturating_add(weight as i64 * src[base + c] as i64);
                    }
                }
            }

            let dst = dst_row + x as usize * channels;
            for (c, &sum) in sums[..channels].iter().enumerate() {
                let value = (sum as f64 / divisor + offset).round();
                output.samples_mut()[dst + c] = value.clamp(0.0, 255.0) as u8;
            }
        }
    }

    output
}

/// Apply one of the named filters.
pub fn apply_preset(image: &PixelBuffer, preset: FilterPreset) -> PixelBuffer {
    apply_kernel(image, &preset.kernel())
}
