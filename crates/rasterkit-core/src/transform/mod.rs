//! Geometric transforms: resize, rotation, flipping and cropping.
//!
//! Every transform borrows its source and returns a new buffer with
//! deterministic output dimensions.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, x grows right, y grows down
//! - Rotation angles are in degrees, positive = counter-clockwise
//! - Crop boxes are pixel coordinates, right/bottom exclusive

mod crop;
mod flip;
mod resize;
mod rotation;

use serde::{Deserialize, Serialize};

pub use crop::{crop, crop_center};
pub use flip::{flip, FlipAxis};
pub use resize::resize;
pub use rotation::{compute_rotated_bounds, rotate};

/// Resampling policy used when mapping source pixels onto a new grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resampling {
    /// Nearest neighbor interpolation (fastest, blocky).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    #[serde(alias = "lanczos")]
    Lanczos3,
}

impl Resampling {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Resampling::Nearest => image::imageops::FilterType::Nearest,
            Resampling::Bilinear => image::imageops::FilterType::Triangle,
            Resampling::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}
