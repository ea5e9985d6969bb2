//! Procedural buffer synthesis.
//!
//! Buffers come from a closed-form gradient or from seeded noise, and vector
//! primitives are rasterized on top with [`draw`]. Random output always takes
//! an explicit seed so the same call produces the same pixels.

mod draw;
mod text;

pub use draw::{draw, draw_all, DrawStyle, Point, Shape};
pub use text::{has_glyph, GLYPH_SIZE};

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::buffer::{Color, ColorMode, PixelBuffer};
use crate::error::Result;

/// Width of the demonstration image produced by [`sample_image`].
pub const SAMPLE_WIDTH: u32 = 400;

/// Height of the demonstration image produced by [`sample_image`].
pub const SAMPLE_HEIGHT: u32 = 300;

/// Generate an RGB gradient.
///
/// For every pixel `(x, y)`:
///
/// ```text
/// red   = floor(255 * x / width)
/// green = floor(255 * y / height)
/// blue  = floor(255 * (x + y) / (width + height))
/// ```
///
/// # Errors
///
/// Returns `RasterError::InvalidDimension` if either dimension is zero.
pub fn generate_gradient(width: u32, height: u32) -> Result<PixelBuffer> {
    let mut image = PixelBuffer::new(width, height, ColorMode::Rgb)?;
    let (w, h) = (width as u64, height as u64);

    for (i, px) in image.samples_mut().chunks_exact_mut(3).enumerate() {
        let x = i as u64 % w;
        let y = i as u64 / w;
        px[0] = (255 * x / w) as u8;
        px[1] = (255 * y / h) as u8;
        px[2] = (255 * (x + y) / (w + h)) as u8;
    }

    Ok(image)
}

/// Generate uniform random samples from a seeded generator.
///
/// Identical `(width, height, mode, seed)` always yields an identical buffer.
pub fn generate_noise(width: u32, height: u32, mode: ColorMode, seed: u64) -> Result<PixelBuffer> {
    let mut image = PixelBuffer::new(width, height, mode)?;
    let mut rng = StdRng::seed_from_u64(seed);
    rng.fill(image.samples_mut());
    debug!("generated {}x{} {:?} noise with seed {}", width, height, mode, seed);
    Ok(image)
}

/// Shapes overlaid on the demonstration gradient.
pub fn sample_overlay() -> Vec<(Shape, DrawStyle)> {
    vec![
        (
            Shape::Ellipse {
                bounds: [50, 50, 150, 150],
            },
            DrawStyle::filled(Color::rgb(255, 255, 0)),
        ),
        (
            Shape::Rectangle {
                bounds: [250, 100, 350, 200],
            },
            DrawStyle::filled(Color::rgb(255, 0, 255)),
        ),
    ]
}

/// The 400x300 demonstration image: a gradient with a yellow disc and a
/// magenta square.
pub fn sample_image() -> Result<PixelBuffer> {
    let gradient = generate_gradient(SAMPLE_WIDTH, SAMPLE_HEIGHT)?;
    Ok(draw_all(&gradient, &sample_overlay()))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
