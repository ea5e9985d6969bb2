//! Overwrite a rectangle of one buffer with another.

use log::debug;

use crate::buffer::PixelBuffer;
use crate::color::convert;
use crate::error::Result;

/// Paste `source` onto a copy of `destination` with its top-left corner at
/// `(offset_x, offset_y)`.
///
/// The pasted rectangle is clipped to the destination on every side, so
/// partially (or entirely) off-canvas pastes are allowed and simply copy
/// less. The source is converted to the destination's mode first.
///
/// # Example
/// ```ignore
/// // 150x100 source at x=500 on a 600-wide canvas: only 100 columns land
/// let combined = paste(&background, &small, 500, 10)?;
/// ```
pub fn paste(
    destination: &PixelBuffer,
    source: &PixelBuffer,
    offset_x: i64,
    offset_y: i64,
) -> Result<PixelBuffer> {
    let source = if source.mode() == destination.mode() {
        std::borrow::Cow::Borrowed(source)
    } else {
        std::borrow::Cow::Owned(convert(source, destination.mode())?)
    };

    let mut output = destination.clone();
    let Some(region) = clip(destination, &source, offset_x, offset_y) else {
        debug!("paste at ({}, {}) lies entirely off canvas", offset_x, offset_y);
        return Ok(output);
    };

    let channels = destination.channels();
    let dst_row_len = destination.width() as usize * channels;
    let src_row_len = source.width() as usize * channels;
    let span = region.width as usize * channels;

    for row in 0..region.height as usize {
        let src_start = (region.src_y as usize + row) * src_row_len + region.src_x as usize * channels;
        let dst_start = (region.dst_y as usize + row) * dst_row_len + region.dst_x as usize * channels;
        output.samples_mut()[dst_start..dst_start + span]
            .copy_from_slice(&source.samples()[src_start..src_start + span]);
    }

    Ok(output)
}

/// Overlap between the offset source and the destination, in both frames.
#[derive(Debug, PartialEq, Eq)]
struct Region {
    src_x: u32,
    src_y: u32,
    dst_x: u32,
    dst_y: u32,
    width: u32,
    height: u32,
}

fn clip(destination: &PixelBuffer, source: &PixelBuffer, offset_x: i64, offset_y: i64) -> Option<Region> {
    let (dst_x0, dst_x1) = clip_axis(offset_x, source.width(), destination.width())?;
    let (dst_y0, dst_y1) = clip_axis(offset_y, source.height(), destination.height())?;
    Some(Region {
        src_x: (dst_x0 - offset_x) as u32,
        src_y: (dst_y0 - offset_y) as u32,
        dst_x: dst_x0 as u32,
        dst_y: dst_y0 as u32,
        width: (dst_x1 - dst_x0) as u32,
        height: (dst_y1 - dst_y0) as u32,
    })
}

/// Destination span `[start, end)` covered by a source of `len` at `offset`.
fn clip_axis(offset: i64, len: u32, limit: u32) -> Option<(i64, i64)> {
    let start = offset.max(0);
    let end = offset.saturating_add(len as i64).min(limit as i64);
    (start < end).then_some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Color, ColorMode};

    fn canvas(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::filled(width, height, ColorMode::Rgb, Color::gray(200)).unwrap()
    }

    fn red(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::filled(width, height, ColorMode::Rgb, Color::rgb(255, 0, 0)).unwrap()
    }

    fn count_red(image: &PixelBuffer) -> usize {
        image.pixels().filter(|p| *p == [255, 0, 0]).count()
    }

    #[test]
    fn test_paste_inside() {
        let dst = canvas(10, 10);
        let out = paste(&dst, &red(3, 2), 4, 5).unwrap();

        assert_eq!(count_red(&out), 6);
        assert_eq!(out.get(4, 5).unwrap(), &[255, 0, 0]);
        assert_eq!(out.get(6, 6).unwrap(), &[255, 0, 0]);
        assert_eq!(out.get(7, 6).unwrap(), &[200, 200, 200]);
        // The destination is untouched
        assert_eq!(count_red(&dst), 0);
    }

    #[test]
    fn test_paste_clips_right_edge() {
        let dst = canvas(600, 400);
        let out = paste(&dst, &red(150, 100), 500, 10).unwrap();

        // Only 600 - 500 = 100 columns fit
        assert_eq!(count_red(&out), 100 * 100);
        assert_eq!(out.get(599, 10).unwrap(), &[255, 0, 0]);
        assert_eq!(out.get(499, 10).unwrap(), &[200, 200, 200]);
        assert_eq!(out.dimensions(), (600, 400));
    }

    #[test]
    fn test_paste_negative_offset() {
        let pixels: Vec<u8> = (0..16).collect();
        let src = PixelBuffer::from_raw(4, 4, ColorMode::Grayscale, pixels).unwrap();
        let dst = PixelBuffer::new(4, 4, ColorMode::Grayscale).unwrap();
        let out = paste(&dst, &src, -2, -1).unwrap();

        // Source (2, 1) lands at (0, 0)
        assert_eq!(out.get(0, 0).unwrap(), &[6]);
        assert_eq!(out.get(1, 2).unwrap(), &[15]);
        assert_eq!(out.get(2, 0).unwrap(), &[0]);
        assert_eq!(out.get(0, 3).unwrap(), &[0]);
    }

    #[test]
    fn test_paste_off_canvas_is_noop() {
        let dst = canvas(10, 10);
        assert_eq!(paste(&dst, &red(5, 5), 10, 0).unwrap(), dst);
        assert_eq!(paste(&dst, &red(5, 5), -5, 0).unwrap(), dst);
        assert_eq!(paste(&dst, &red(5, 5), 0, i64::MAX).unwrap(), dst);
    }

    #[test]
    fn test_paste_converts_mode() {
        let dst = PixelBuffer::new(4, 4, ColorMode::Grayscale).unwrap();
        let out = paste(&dst, &red(2, 2), 0, 0).unwrap();

        assert_eq!(out.mode(), ColorMode::Grayscale);
        assert_eq!(out.get(1, 1).unwrap(), &[76]);
    }

    #[test]
    fn test_clip_axis() {
        assert_eq!(clip_axis(500, 150, 600), Some((500, 600)));
        assert_eq!(clip_axis(-10, 20, 600), Some((0, 10)));
        assert_eq!(clip_axis(-20, 20, 600), None);
        assert_eq!(clip_axis(600, 1, 600), None);
    }
}
