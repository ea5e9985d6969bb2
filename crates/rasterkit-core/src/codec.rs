//! Encoding and decoding at the file boundary.
//!
//! PNG and JPEG are supported through the `image` crate. Decoding sniffs the
//! format from the bytes; encoding picks the format explicitly or from a file
//! extension.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageReader};
use log::debug;

use crate::buffer::{ColorMode, PixelBuffer};
use crate::error::{RasterError, Result};

/// JPEG quality used when none is given.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Target encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    /// Quality 1-100, higher is better.
    Jpeg { quality: u8 },
}

impl OutputFormat {
    /// Pick the format from a path's extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RasterError::UnsupportedFormat` for anything but
    /// `png`, `jpg` and `jpeg`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg {
                quality: DEFAULT_JPEG_QUALITY,
            }),
            _ => Err(RasterError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Decode PNG or JPEG bytes.
///
/// # Errors
///
/// Returns `RasterError::Io` if the format is unrecognized or the data is
/// corrupt.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let image = reader.decode()?;
    PixelBuffer::from_dynamic(image)
}

/// Encode a buffer to bytes.
pub fn encode(image: &PixelBuffer, format: OutputFormat) -> Result<Vec<u8>> {
    let color_type = match image.mode() {
        ColorMode::Grayscale => ExtendedColorType::L8,
        ColorMode::Rgb => ExtendedColorType::Rgb8,
    };

    let mut buffer = Cursor::new(Vec::new());
    match format {
        OutputFormat::Png => PngEncoder::new(&mut buffer).write_image(
            image.samples(),
            image.width(),
            image.height(),
            color_type,
        )?,
        OutputFormat::Jpeg { quality } => {
            JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100)).write_image(
                image.samples(),
                image.width(),
                image.height(),
                color_type,
            )?
        }
    }

    Ok(buffer.into_inner())
}

/// Read and decode an image file.
pub fn load(path: impl AsRef<Path>) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| with_path(path, e))?;
    let image = decode(&bytes).map_err(|e| with_path(path, e))?;
    debug!(
        "loaded {} ({}x{} {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.mode()
    );
    Ok(image)
}

/// Encode and write an image file, choosing the format from the extension.
pub fn save(image: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path)?;
    let bytes = encode(image, format)?;
    std::fs::write(path, bytes).map_err(|e| with_path(path, e))?;
    debug!("saved {}", path.display());
    Ok(())
}

fn with_path(path: &Path, err: impl Into<RasterError>) -> RasterError {
    match err.into() {
        RasterError::Io(msg) => RasterError::Io(format!("{}: {}", path.display(), msg)),
        other => other,
    }
}
