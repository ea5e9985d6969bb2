//! Error types shared by every raster operation.

use thiserror::Error;

use crate::buffer::ColorMode;

/// Errors produced by buffer, transform, codec and pipeline operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RasterError {
    /// A requested width or height is zero, or raw data does not match the size.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Pixel access outside the buffer extent.
    #[error("Pixel ({x}, {y}) is outside a {width}x{height} buffer")]
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    /// Crop box is empty or extends past the source.
    #[error("Invalid region ({left}, {top}, {right}, {bottom}) for a {width}x{height} buffer")]
    InvalidRegion {
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
        width: u32,
        height: u32,
    },

    /// The operation requires a different color mode.
    #[error("Unsupported color mode: expected {expected:?}, got {actual:?}")]
    UnsupportedMode { expected: ColorMode, actual: ColorMode },

    /// A pixel value has the wrong number of channels for the buffer.
    #[error("Expected {expected} channel(s), got {actual}")]
    ChannelCount { expected: usize, actual: usize },

    /// Buffers that must share a size do not.
    #[error("Dimension mismatch: {expected:?} vs {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Kernel geometry or divisor is unusable.
    #[error("Invalid kernel: {0}")]
    InvalidKernel(String),

    /// File extension or format has no encoder.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Load, save, decode or encode failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A batch item exceeded its wall-clock budget.
    #[error("Timed out after {millis} ms")]
    Timeout { millis: u64 },

    /// Two batch inputs would write the same output file.
    #[error("Output {output} is already written for {first}")]
    OutputConflict { output: String, first: String },

    /// A batch item stopped without producing a result.
    #[error("Aborted: {0}")]
    Aborted(String),
}

impl From<std::io::Error> for RasterError {
    fn from(err: std::io::Error) -> Self {
        RasterError::Io(err.to_string())
    }
}

impl From<image::ImageError> for RasterError {
    fn from(err: image::ImageError) -> Self {
        RasterError::Io(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RasterError>;
