//! RasterKit Core - raster image synthesis and transformation
//!
//! This crate provides the image engine behind the `rasterkit` command line:
//! procedural generation, geometric transforms, convolution filters, tonal
//! enhancement, color mapping, compositing, thumbnails and batch processing.
//!
//! Every operation borrows a [`PixelBuffer`] and returns a new one, so a
//! buffer is never changed behind its owner's back.

pub mod buffer;
pub mod codec;
pub mod color;
pub mod composite;
pub mod config;
pub mod enhance;
pub mod error;
pub mod filter;
pub mod generate;
pub mod luminance;
pub mod pipeline;
pub mod thumbnail;
pub mod transform;

pub use buffer::{Color, ColorMode, NumericArray, PixelBuffer};
pub use codec::{decode, encode, load, save, OutputFormat};
pub use color::{apply_color_matrix, convert, to_grayscale, to_rgb, ColorMatrix};
pub use composite::{merge_channels, paste, split_channels};
pub use config::PipelineConfig;
pub use enhance::{enhance, Enhancement};
pub use error::{RasterError, Result};
pub use filter::{apply_kernel, apply_preset, FilterPreset, Kernel, KernelSpec};
pub use generate::{
    draw, draw_all, generate_gradient, generate_noise, has_glyph, sample_image, DrawStyle, Shape,
};
pub use pipeline::{
    discover_images, BatchJob, BatchOptions, BatchPipeline, BatchReport, JobStatus, Operation,
    TransformSequence,
};
pub use thumbnail::{thumbnail, thumbnail_size};
pub use transform::{
    compute_rotated_bounds, crop, crop_center, flip, resize, rotate, FlipAxis, Resampling,
};
