//! Serializable operations and ordered transform sequences.
//!
//! Operations mirror the single-buffer API of the crate. Settings that have a
//! sensible global value (resampling filter, rotation expansion, enhancement
//! factor, thumbnail box, kernel) are optional per operation and fall back to
//! the sequence's [`OperationDefaults`].
//!
//! # JSON form
//!
//! ```text
//! [
//!   { "op": "resize", "width": 300, "height": 200 },
//!   { "op": "filter", "kernel": "sharpen" },
//!   { "op": "enhance", "kind": "contrast", "factor": 1.2 }
//! ]
//! ```

use std::borrow::Cow;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::color::{apply_color_matrix, to_grayscale, ColorMatrix};
use crate::enhance::{enhance, Enhancement};
use crate::error::Result;
use crate::filter::{apply_kernel, FilterPreset, KernelSpec};
use crate::thumbnail::thumbnail;
use crate::transform::{crop, flip, resize, rotate, FlipAxis, Resampling};

/// Bounding box used by thumbnail operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailBox {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ThumbnailBox {
    fn default() -> Self {
        Self {
            max_width: 128,
            max_height: 128,
        }
    }
}

/// Fallback settings for operations that leave them unspecified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationDefaults {
    pub resampling: Resampling,
    pub rotation_expand: bool,
    pub enhancement_factor: f32,
    pub thumbnail: ThumbnailBox,
    pub kernel: KernelSpec,
}

impl Default for OperationDefaults {
    fn default() -> Self {
        Self {
            resampling: Resampling::default(),
            rotation_expand: true,
            enhancement_factor: 1.0,
            thumbnail: ThumbnailBox::default(),
            kernel: KernelSpec::Preset(FilterPreset::Sharpen),
        }
    }
}

/// One step of a transform sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Resize {
        width: u32,
        height: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resampling: Option<Resampling>,
    },
    Rotate {
        degrees: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expand: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resampling: Option<Resampling>,
    },
    Flip {
        axis: FlipAxis,
    },
    Crop {
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
    },
    Filter {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kernel: Option<KernelSpec>,
    },
    Enhance {
        kind: Enhancement,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        factor: Option<f32>,
    },
    Grayscale,
    ColorMatrix {
        matrix: ColorMatrix,
    },
    Thumbnail {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_width: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_height: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resampling: Option<Resampling>,
    },
}

impl Operation {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Resize { .. } => "resize",
            Operation::Rotate { .. } => "rotate",
            Operation::Flip { .. } => "flip",
            Operation::Crop { .. } => "crop",
            Operation::Filter { .. } => "filter",
            Operation::Enhance { .. } => "enhance",
            Operation::Grayscale => "grayscale",
            Operation::ColorMatrix { .. } => "color_matrix",
            Operation::Thumbnail { .. } => "thumbnail",
        }
    }

    /// Apply this operation, resolving unset options from `defaults`.
    pub fn apply(&self, image: &PixelBuffer, defaults: &OperationDefaults) -> Result<PixelBuffer> {
        match self {
            Operation::Resize {
                width,
                height,
                resampling,
            } => resize(image, *width, *height, resampling.unwrap_or(defaults.resampling)),
            Operation::Rotate {
                degrees,
                expand,
                resampling,
            } => rotate(
                image,
                *degrees,
                expand.unwrap_or(defaults.rotation_expand),
                resampling.unwrap_or(defaults.resampling),
            ),
            Operation::Flip { axis } => Ok(flip(image, *axis)),
            Operation::Crop {
                left,
                top,
                right,
                bottom,
            } => crop(image, *left, *top, *right, *bottom),
            Operation::Filter { kernel } => {
                let kernel = kernel.as_ref().unwrap_or(&defaults.kernel).to_kernel()?;
                Ok(apply_kernel(image, &kernel))
            }
            Operation::Enhance { kind, factor } => {
                enhance(image, *kind, factor.unwrap_or(defaults.enhancement_factor))
            }
            Operation::Grayscale => to_grayscale(image),
            Operation::ColorMatrix { matrix } => apply_color_matrix(image, matrix),
            Operation::Thumbnail {
                max_width,
                max_height,
                resampling,
            } => thumbnail(
                image,
                max_width.unwrap_or(defaults.thumbnail.max_width),
                max_height.unwrap_or(defaults.thumbnail.max_height),
                resampling.unwrap_or(defaults.resampling),
            ),
        }
    }
}

/// An ordered list of operations applied left to right.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformSequence {
    operations: Vec<Operation>,
    defaults: OperationDefaults,
}

impl TransformSequence {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self {
            operations,
            defaults: OperationDefaults::default(),
        }
    }

    /// The batch recipe: resize to 300x200, sharpen, then raise contrast by 20%.
    pub fn standard_batch() -> Self {
        Self::new(standard_operations())
    }

    pub fn with_defaults(mut self, defaults: OperationDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Append an operation.
    pub fn then(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn defaults(&self) -> &OperationDefaults {
        &self.defaults
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Run every operation in order. The first failure stops the sequence.
    pub fn apply(&self, image: &PixelBuffer) -> Result<PixelBuffer> {
        let mut current = Cow::Borrowed(image);
        for operation in &self.operations {
            debug!("applying {}", operation.name());
            current = Cow::Owned(operation.apply(&current, &self.defaults)?);
        }
        Ok(current.into_owned())
    }
}

impl FromIterator<Operation> for TransformSequence {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Operations of [`TransformSequence::standard_batch`].
pub fn standard_operations() -> Vec<Operation> {
    vec![
        Operation::Resize {
            width: 300,
            height: 200,
            resampling: None,
        },
        Operation::Filter {
            kernel: Some(KernelSpec::Preset(FilterPreset::Sharpen)),
        },
        Operation::Enhance {
            kind: Enhancement::Contrast,
            factor: Some(1.2),
        },
    ]
}
