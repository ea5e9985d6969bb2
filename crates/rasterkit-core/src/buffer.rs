//! The pixel buffer every component reads and produces.
//!
//! A [`PixelBuffer`] owns a row-major grid of 8-bit samples together with its
//! [`ColorMode`]. Samples are interleaved, so an RGB pixel occupies three
//! consecutive bytes. Operations elsewhere in the crate take `&PixelBuffer`
//! and return a fresh buffer; nothing mutates a caller's buffer behind its
//! back.

use serde::{Deserialize, Serialize};

use crate::error::{RasterError, Result};
use crate::luminance::luma_u8;

/// Channel layout of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// One luminance channel per pixel.
    Grayscale,
    /// Red, green and blue channels per pixel.
    #[default]
    Rgb,
}

impl ColorMode {
    /// Number of samples per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Grayscale => 1,
            ColorMode::Rgb => 3,
        }
    }
}

/// An RGB color used for fills, outlines and text.
///
/// When written into a grayscale buffer the color is reduced to its luminance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Samples for this color in the given mode. Only the first
    /// `mode.channels()` entries are meaningful.
    #[inline]
    pub fn samples(self, mode: ColorMode) -> [u8; 3] {
        match mode {
            ColorMode::Grayscale => [luma_u8(self.r, self.g, self.b), 0, 0],
            ColorMode::Rgb => [self.r, self.g, self.b],
        }
    }
}

impl From<[u8; 3]> for Color {
    fn from(c: [u8; 3]) -> Self {
        Color::rgb(c[0], c[1], c[2])
    }
}

/// A raster image with 8-bit channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    mode: ColorMode,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Create a black buffer.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::InvalidDimension` if either dimension is zero.
    pub fn new(width: u32, height: u32, mode: ColorMode) -> Result<Self> {
        check_dimensions(width, height)?;
        let len = width as usize * height as usize * mode.channels();
        Ok(Self {
            width,
            height,
            mode,
            samples: vec![0u8; len],
        })
    }

    /// Create a buffer where every pixel is `fill`.
    pub fn filled(width: u32, height: u32, mode: ColorMode, fill: Color) -> Result<Self> {
        check_dimensions(width, height)?;
        let channels = mode.channels();
        let pixel = fill.samples(mode);
        let samples = pixel[..channels]
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * channels)
            .collect();
        Ok(Self {
            width,
            height,
            mode,
            samples,
        })
    }

    /// Adopt raw interleaved samples.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::InvalidDimension` if a dimension is zero or the
    /// sample count does not equal `width * height * channels`.
    pub fn from_raw(width: u32, height: u32, mode: ColorMode, samples: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;
        if samples.len() != width as usize * height as usize * mode.channels() {
            return Err(RasterError::InvalidDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            mode,
            samples,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.mode.channels()
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw interleaved samples in row-major order.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.samples
    }

    /// Iterate over pixels as channel slices.
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.samples.chunks_exact(self.channels())
    }

    /// Read the channels of the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// Returns `RasterError::OutOfBounds` outside the buffer extent.
    pub fn get(&self, x: u32, y: u32) -> Result<&[u8]> {
        self.check_bounds(x, y)?;
        Ok(self.pixel(x, y))
    }

    /// Write the pixel at (x, y), clamping every channel to [0, 255].
    ///
    /// # Errors
    ///
    /// Returns `RasterError::OutOfBounds` outside the buffer extent and
    /// `RasterError::ChannelCount` if `value` has the wrong arity.
    pub fn set(&mut self, x: u32, y: u32, value: &[i32]) -> Result<()> {
        self.check_bounds(x, y)?;
        let channels = self.channels();
        if value.len() != channels {
            return Err(RasterError::ChannelCount {
                expected: channels,
                actual: value.len(),
            });
        }
        let idx = self.index(x, y);
        for (dst, &v) in self.samples[idx..idx + channels].iter_mut().zip(value) {
            *dst = v.clamp(0, 255) as u8;
        }
        Ok(())
    }

    /// Unchecked read used by the per-pixel algorithms; callers guarantee bounds.
    #[inline]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let idx = self.index(x, y);
        &self.samples[idx..idx + self.channels()]
    }

    #[inline]
    pub(crate) fn put(&mut self, x: u32, y: u32, color: &[u8]) {
        let idx = self.index(x, y);
        let channels = self.channels();
        self.samples[idx..idx + channels].copy_from_slice(&color[..channels]);
    }

    /// Write a color at signed coordinates, ignoring anything off canvas.
    #[inline]
    pub(crate) fn put_clipped(&mut self, x: i64, y: i64, color: &[u8]) {
        if x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64 {
            self.put(x as u32, y as u32, color);
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels()
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(RasterError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Build a buffer from any decoded `image` value.
    ///
    /// Luma sources become `Grayscale`; everything else is converted to `Rgb`
    /// and any alpha channel is dropped.
    pub fn from_dynamic(image: image::DynamicImage) -> Result<Self> {
        use image::DynamicImage;

        let (width, height) = (image.width(), image.height());
        match image {
            DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_) => Self::from_raw(
                width,
                height,
                ColorMode::Grayscale,
                image.into_luma8().into_raw(),
            ),
            other => Self::from_raw(width, height, ColorMode::Rgb, other.into_rgb8().into_raw()),
        }
    }

    /// Convert into the `image` crate's representation for encoding.
    pub fn to_dynamic(&self) -> Option<image::DynamicImage> {
        let samples = self.samples.clone();
        match self.mode {
            ColorMode::Grayscale => image::GrayImage::from_raw(self.width, self.height, samples)
                .map(image::DynamicImage::ImageLuma8),
            ColorMode::Rgb => image::RgbImage::from_raw(self.width, self.height, samples)
                .map(image::DynamicImage::ImageRgb8),
        }
    }

    /// Export as a dense numeric array for analysis collaborators.
    pub fn to_numeric_array(&self) -> NumericArray {
        NumericArray {
            width: self.width,
            height: self.height,
            channels: self.channels() as u8,
            data: self.samples.clone(),
        }
    }

    /// Copy of this buffer with `f` applied to every sample.
    pub(crate) fn map_samples(&self, f: impl Fn(u8) -> u8) -> Self {
        Self {
            width: self.width,
            height: self.height,
            mode: self.mode,
            samples: self.samples.iter().map(|&s| f(s)).collect(),
        }
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidDimension { width, height });
    }
    Ok(())
}

/// Dense integer array with explicit shape metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericArray {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    /// Row-major, channel-interleaved samples.
    pub data: Vec<u8>,
}

impl NumericArray {
    /// Rebuild a pixel buffer from the array.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::ChannelCount` for channel counts other than 1 or 3,
    /// and `RasterError::InvalidDimension` if the data length is inconsistent.
    pub fn into_buffer(self) -> Result<PixelBuffer> {
        let mode = match self.channels {
            1 => ColorMode::Grayscale,
            3 => ColorMode::Rgb,
            n => {
                return Err(RasterError::ChannelCount {
                    expected: 3,
                    actual: n as usize,
                })
            }
        };
        PixelBuffer::from_raw(self.width, self.height, mode, self.data)
    }
}
