//! Image rotation about the center, with optional canvas expansion.
//!
//! Exact quarter turns are performed by transposing pixel indices. Any other
//! angle uses inverse mapping: for each output pixel center we compute the
//! source position and sample it with the chosen [`Resampling`] policy.
//!
//! With y pointing down, the inverse transform for a counter-clockwise
//! rotation by θ is:
//! ```text
//! src_x = (dst_x - cx) * cos(θ) - (dst_y - cy) * sin(θ) + src_cx
//! src_y = (dst_x - cx) * sin(θ) + (dst_y - cy) * cos(θ) + src_cy
//! ```
//!
//! Output area with no source pixel behind it is filled with black.

use log::debug;

use super::Resampling;
use crate::buffer::PixelBuffer;
use crate::error::Result;

/// Tolerance, in degrees, for treating an angle as an exact quarter turn.
const QUARTER_TURN_EPSILON: f64 = 0.001;

/// Compute the dimensions of the bounding box for a rotated image.
///
/// When an image is rotated, the corners extend beyond the original bounds.
/// This function calculates the minimum bounding box that contains the
/// entire rotated image.
///
/// # Arguments
///
/// * `width` - Original image width
/// * `height` - Original image height
/// * `angle_degrees` - Rotation angle in degrees (positive = counter-clockwise)
///
/// # Returns
///
/// Tuple of (new_width, new_height) for the rotated bounding box.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    match quarter_turns(angle_degrees) {
        Some(0) | Some(2) => return (width, height),
        Some(_) => return (height, width),
        None => {}
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    // The bounding box of a rotated rectangle is:
    // new_w = |w*cos| + |h*sin|
    // new_h = |w*sin| + |h*cos|
    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate an image about its center.
///
/// # Arguments
///
/// * `image` - Source image to rotate
/// * `angle_degrees` - Rotation angle in degrees (positive = counter-clockwise)
/// * `expand` - Grow the canvas to hold the whole rotated image; otherwise the
///   output keeps the source dimensions and the corners are clipped
/// * `resampling` - Sampling policy for angles that are not quarter turns
///
/// # Returns
///
/// New `PixelBuffer` with the rotated content, in the source's mode.
pub fn rotate(
    image: &PixelBuffer,
    angle_degrees: f64,
    expand: bool,
    resampling: Resampling,
) -> Result<PixelBuffer> {
    let (src_w, src_h) = image.dimensions();
    let turns = quarter_turns(angle_degrees);

    match turns {
        Some(0) => return Ok(image.clone()),
        Some(2) => return rotate_180(image),
        Some(t) if expand || src_w == src_h => return rotate_quarter(image, t == 1),
        _ => {}
    }

    let (dst_w, dst_h) = if expand {
        compute_rotated_bounds(src_w, src_h, angle_degrees)
    } else {
        (src_w, src_h)
    };

    debug!(
        "rotate {}x{} by {} degrees (expand={}) -> {}x{}",
        src_w, src_h, angle_degrees, expand, dst_w, dst_h
    );

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    let src_cx = src_w as f64 / 2.0;
    let src_cy = src_h as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = PixelBuffer::new(dst_w, dst_h, image.mode())?;

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            // Work from pixel centers so the rotation is symmetric
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            // Source position in pixel-index space
            let src_x = dx * cos - dy * sin + src_cx - 0.5;
            let src_y = dx * sin + dy * cos + src_cy - 0.5;

            let pixel = match resampling {
                Resampling::Nearest => sample_nearest(image, src_x, src_y),
                Resampling::Bilinear => sample_bilinear(image, src_x, src_y),
                Resampling::Lanczos3 => sample_lanczos3(image, src_x, src_y),
            };

            if let Some(pixel) = pixel {
                output.put(dst_x, dst_y, &pixel);
            }
        }
    }

    Ok(output)
}

/// Number of counter-clockwise quarter turns if the angle is a multiple of 90°.
fn quarter_turns(angle_degrees: f64) -> Option<u32> {
    let normalized = angle_degrees.rem_euclid(360.0);
    let turns = (normalized / 90.0).round();
    if (normalized - turns * 90.0).abs() < QUARTER_TURN_EPSILON {
        Some(turns as u32 % 4)
    } else {
        None
    }
}

fn rotate_180(image: &PixelBuffer) -> Result<PixelBuffer> {
    let (w, h) = image.dimensions();
    let mut output = PixelBuffer::new(w, h, image.mode())?;
    for y in 0..h {
        for x in 0..w {
            output.put(x, y, image.pixel(w - 1 - x, h - 1 - y));
        }
    }
    Ok(output)
}

/// Exact 90° rotation; dimensions swap.
fn rotate_quarter(image: &PixelBuffer, counter_clockwise: bool) -> Result<PixelBuffer> {
    let (w, h) = image.dimensions();
    let mut output = PixelBuffer::new(h, w, image.mode())?;
    for y in 0..w {
        for x in 0..h {
            let src = if counter_clockwise {
                image.pixel(w - 1 - y, x)
            } else {
                image.pixel(y, h - 1 - x)
            };
            output.put(x, y, src);
        }
    }
    Ok(output)
}

/// Get a pixel as [f64; 3] from an image at the given coordinates.
#[inline]
fn get_pixel_f64(image: &PixelBuffer, px: u32, py: u32) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (o, &s) in out.iter_mut().zip(image.pixel(px, py)) {
        *o = s as f64;
    }
    out
}

fn sample_nearest(image: &PixelBuffer, x: f64, y: f64) -> Option<[u8; 3]> {
    let px = x.round();
    let py = y.round();
    if px < 0.0 || py < 0.0 || px >= image.width() as f64 || py >= image.height() as f64 {
        return None;
    }
    let mut out = [0u8; 3];
    let src = image.pixel(px as u32, py as u32);
    out[..src.len()].copy_from_slice(src);
    Some(out)
}

/// Sample a pixel using bilinear interpolation.
///
/// Bilinear interpolation considers the 4 nearest pixels and weights
/// their contribution based on distance. Positions within half a pixel of
/// the border reuse the edge pixels.
fn sample_bilinear(image: &PixelBuffer, x: f64, y: f64) -> Option<[u8; 3]> {
    let (w, h) = (image.width() as f64, image.height() as f64);

    // Return None (black) for positions outside the source footprint
    if x < -0.5 || x > w - 0.5 || y < -0.5 || y > h - 0.5 {
        return None;
    }

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let clamp_x = |v: f64| v.clamp(0.0, w - 1.0) as u32;
    let clamp_y = |v: f64| v.clamp(0.0, h - 1.0) as u32;
    let (xa, xb) = (clamp_x(x0), clamp_x(x0 + 1.0));
    let (ya, yb) = (clamp_y(y0), clamp_y(y0 + 1.0));

    let p00 = get_pixel_f64(image, xa, ya);
    let p10 = get_pixel_f64(image, xb, ya);
    let p01 = get_pixel_f64(image, xa, yb);
    let p11 = get_pixel_f64(image, xb, yb);

    let mut result = [0u8; 3];
    for i in 0..image.channels() {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    Some(result)
}

/// Sample a pixel using Lanczos3 interpolation.
///
/// Lanczos3 considers a 6x6 neighborhood of pixels, providing
/// higher quality results especially for sharp edges.
fn sample_lanczos3(image: &PixelBuffer, x: f64, y: f64) -> Option<[u8; 3]> {
    let (w, h) = (image.width() as i64, image.height() as i64);

    // Check bounds with kernel radius - fall back to bilinear near edges
    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    // Sample 6x6 neighborhood
    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;

            let dx = x - px as f64;
            let dy = y - py as f64;
            let weight = lanczos_weight(dx, 3.0) * lanczos_weight(dy, 3.0);

            let pixel = get_pixel_f64(image, px as u32, py as u32);
            for (s, p) in sum.iter_mut().zip(pixel) {
                *s += p * weight;
            }
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 3];
    if weight_sum > 0.0 {
        for i in 0..image.channels() {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    Some(result)
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
