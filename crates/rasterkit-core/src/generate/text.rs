//! Bitmap text using the `font8x8` basic Latin glyph set.

use font8x8::{UnicodeFonts, BASIC_FONTS};
use log::debug;

use super::draw::Point;
use crate::buffer::PixelBuffer;

/// Width and height of one glyph cell in pixels.
pub const GLYPH_SIZE: i64 = 8;

/// Whether the built-in glyph set can render `ch`.
pub fn has_glyph(ch: char) -> bool {
    BASIC_FONTS.get(ch).is_some()
}

/// Draw `text` with its top-left corner at `origin`.
///
/// Each character occupies one cell. Characters without a glyph are skipped
/// but still advance the cursor, so the remaining text keeps its position.
pub(crate) fn draw_text(canvas: &mut PixelBuffer, origin: Point, text: &str, color: &[u8]) {
    let (ox, oy) = origin;

    for (i, ch) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch) else {
            debug!("no glyph for {:?}, skipping", ch);
            continue;
        };

        let left = ox + i as i64 * GLYPH_SIZE;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..8u32 {
                // Bit 0 is the leftmost column
                if (bits >> col) & 1 == 1 {
                    canvas.put_clipped(left + col as i64, oy + row as i64, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ColorMode;

    const WHITE: [u8; 3] = [255, 255, 255];

    #[test]
    fn test_has_glyph() {
        assert!(has_glyph('A'));
        assert!(has_glyph(' '));
        assert!(!has_glyph('é'));
        assert!(!has_glyph('€'));
    }

    #[test]
    fn test_draw_letter() {
        let mut canvas = PixelBuffer::new(8, 8, ColorMode::Rgb).unwrap();
        draw_text(&mut canvas, (0, 0), "A", &WHITE);

        // Top row of 'A' is 0x0C: columns 2 and 3
        assert_eq!(canvas.get(2, 0).unwrap(), &WHITE);
        assert_eq!(canvas.get(3, 0).unwrap(), &WHITE);
        assert_eq!(canvas.get(0, 0).unwrap(), &[0, 0, 0]);
        // Last row is empty
        assert!((0..8).all(|x| canvas.get(x, 7).unwrap() == [0, 0, 0]));
    }

    #[test]
    fn test_missing_glyph_skipped_but_advances() {
        let mut canvas = PixelBuffer::new(16, 8, ColorMode::Rgb).unwrap();
        draw_text(&mut canvas, (0, 0), "éA", &WHITE);

        let first_cell_lit = (0..8).any(|x| (0..8).any(|y| canvas.get(x, y).unwrap() != [0, 0, 0]));
        assert!(!first_cell_lit);
        assert_eq!(canvas.get(10, 0).unwrap(), &WHITE);
    }

    #[test]
    fn test_text_clipped_at_edges() {
        let mut canvas = PixelBuffer::new(4, 4, ColorMode::Rgb).unwrap();
        draw_text(&mut canvas, (-2, -1), "AA", &WHITE);

        // Second glyph row of 'A' is 0x1E (columns 1..=4), shifted two left
        assert_eq!(canvas.get(0, 0).unwrap(), &WHITE);
        assert_eq!(canvas.get(2, 0).unwrap(), &WHITE);
        assert_eq!(canvas.get(3, 0).unwrap(), &[0, 0, 0]);
    }
}
