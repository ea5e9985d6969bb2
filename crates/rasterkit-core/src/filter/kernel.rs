//! Convolution kernels and the fixed filter presets.

use serde::{Deserialize, Serialize};

use crate::error::{RasterError, Result};

/// An odd-sized grid of integer weights with a divisor and offset.
///
/// Each output sample is `round(sum(weight * neighbor) / divisor + offset)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    width: usize,
    height: usize,
    weights: Vec<i32>,
    divisor: i32,
    offset: i32,
}

impl Kernel {
    /// Build a kernel from row-major weights.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::InvalidKernel` if a dimension is even or zero,
    /// the weight count does not equal `width * height`, or `divisor` is zero.
    pub fn new(
        width: usize,
        height: usize,
        weights: Vec<i32>,
        divisor: i32,
        offset: i32,
    ) -> Result<Self> {
        if width == 0 || height == 0 || width % 2 == 0 || height % 2 == 0 {
            return Err(RasterError::InvalidKernel(format!(
                "size must be odd and non-zero, got {}x{}",
                width, height
            )));
        }
        if weights.len() != width * height {
            return Err(RasterError::InvalidKernel(format!(
                "expected {} weights for a {}x{} kernel, got {}",
                width * height,
                width,
                height,
                weights.len()
            )));
        }
        if divisor == 0 {
            return Err(RasterError::InvalidKernel("divisor must be non-zero".to_string()));
        }
        Ok(Self {
            width,
            height,
            weights,
            divisor,
            offset,
        })
    }

    /// 3x3 kernel; always valid for a non-zero divisor.
    fn square3(weights: [i32; 9], divisor: i32, offset: i32) -> Self {
        Self {
            width: 3,
            height: 3,
            weights: weights.to_vec(),
            divisor,
            offset,
        }
    }

    /// 5x5 kernel; always valid for a non-zero divisor.
    fn square5(weights: [i32; 25], divisor: i32, offset: i32) -> Self {
        Self {
            width: 5,
            height: 5,
            weights: weights.to_vec(),
            divisor,
            offset,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn weights(&self) -> &[i32] {
        &self.weights
    }

    pub fn divisor(&self) -> i32 {
        self.divisor
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }
}

/// Named fixed-kernel filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPreset {
    Blur,
    Sharpen,
    Emboss,
    EdgeEnhance,
    Smooth,
    Contour,
    Detail,
    EdgeEnhanceMore,
    FindEdges,
    SmoothMore,
}

impl FilterPreset {
    pub const ALL: [FilterPreset; 10] = [
        FilterPreset::Blur,
        FilterPreset::Sharpen,
        FilterPreset::Emboss,
        FilterPreset::EdgeEnhance,
        FilterPreset::Smooth,
        FilterPreset::Contour,
        FilterPreset::Detail,
        FilterPreset::EdgeEnhanceMore,
        FilterPreset::FindEdges,
        FilterPreset::SmoothMore,
    ];

    /// The kernel, divisor and offset for this preset.
    pub fn kernel(self) -> Kernel {
        match self {
            FilterPreset::Blur => Kernel::square5(
                [
                    1, 1, 1, 1, 1, //
                    1, 0, 0, 0, 1, //
                    1, 0, 0, 0, 1, //
                    1, 0, 0, 0, 1, //
                    1, 1, 1, 1, 1,
                ],
                16,
                0,
            ),
            FilterPreset::Sharpen => {
                Kernel::square3([-2, -2, -2, -2, 32, -2, -2, -2, -2], 16, 0)
            }
            FilterPreset::Emboss => Kernel::square3([-1, 0, 0, 0, 1, 0, 0, 0, 0], 1, 128),
            FilterPreset::EdgeEnhance => {
                Kernel::square3([-1, -1, -1, -1, 10, -1, -1, -1, -1], 2, 0)
            }
            FilterPreset::Smooth => Kernel::square3([1, 1, 1, 1, 5, 1, 1, 1, 1], 13, 0),
            FilterPreset::Contour => {
                Kernel::square3([-1, -1, -1, -1, 8, -1, -1, -1, -1], 1, 255)
            }
            FilterPreset::Detail => Kernel::square3([0, -1, 0, -1, 10, -1, 0, -1, 0], 6, 0),
            FilterPreset::EdgeEnhanceMore => {
                Kernel::square3([-1, -1, -1, -1, 9, -1, -1, -1, -1], 1, 0)
            }
            FilterPreset::FindEdges => {
                Kernel::square3([-1, -1, -1, -1, 8, -1, -1, -1, -1], 1, 0)
            }
            FilterPreset::SmoothMore => Kernel::square5(
                [
                    1, 1, 1, 1, 1, //
                    1, 5, 5, 5, 1, //
                    1, 5, 44, 5, 1, //
                    1, 5, 5, 5, 1, //
                    1, 1, 1, 1, 1,
                ],
                100,
                0,
            ),
        }
    }

    /// Lowercase name used in file names and logs.
    pub fn name(self) -> &'static str {
        match self {
            FilterPreset::Blur => "blur",
            FilterPreset::Sharpen => "sharpen",
            FilterPreset::Emboss => "emboss",
            FilterPreset::EdgeEnhance => "edge_enhance",
            FilterPreset::Smooth => "smooth",
            FilterPreset::Contour => "contour",
            FilterPreset::Detail => "detail",
            FilterPreset::EdgeEnhanceMore => "edge_enhance_more",
            FilterPreset::FindEdges => "find_edges",
            FilterPreset::SmoothMore => "smooth_more",
        }
    }
}

/// Kernel selection as it appears in configuration: a named preset or an
/// explicit kernel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KernelSpec {
    Preset(FilterPreset),
    Custom {
        width: usize,
        height: usize,
        weights: Vec<i32>,
        #[serde(default = "default_divisor")]
        divisor: i32,
        #[serde(default)]
        offset: i32,
    },
}

fn default_divisor() -> i32 {
    1
}

impl KernelSpec {
    /// Resolve into a validated kernel.
    pub fn to_kernel(&self) -> Result<Kernel> {
        match self {
            KernelSpec::Preset(preset) => Ok(preset.kernel()),
            KernelSpec::Custom {
                width,
                height,
                weights,
                divisor,
                offset,
            } => Kernel::new(*width, *height, weights.clone(), *divisor, *offset),
        }
    }
}

impl From<FilterPreset> for KernelSpec {
    fn from(preset: FilterPreset) -> Self {
        KernelSpec::Preset(preset)
    }
}
