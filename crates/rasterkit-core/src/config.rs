//! Pipeline configuration read from JSON.
//!
//! Every field is optional; a missing field takes its default. An empty
//! object therefore describes the standard batch recipe (resize to 300x200,
//! sharpen, contrast x1.2) run sequentially.
//!
//! # Example
//!
//! ```text
//! {
//!   "operations": [
//!     { "op": "thumbnail" },
//!     { "op": "enhance", "kind": "color" }
//!   ],
//!   "workers": 4,
//!   "item_timeout_secs": 30,
//!   "limit": 5,
//!   "defaults": {
//!     "resampling": "lanczos",
//!     "enhancement_factor": 1.5,
//!     "thumbnail": { "max_width": 64, "max_height": 64 }
//!   }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{RasterError, Result};
use crate::pipeline::{
    standard_operations, BatchOptions, BatchPipeline, Operation, OperationDefaults,
    TransformSequence, DEFAULT_OUTPUT_PREFIX,
};

/// Batch pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub operations: Vec<Operation>,
    pub workers: usize,
    pub item_timeout_secs: Option<f64>,
    pub output_prefix: String,
    pub limit: Option<usize>,
    pub defaults: OperationDefaults,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            operations: standard_operations(),
            workers: 1,
            item_timeout_secs: None,
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            limit: None,
            defaults: OperationDefaults::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RasterError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| RasterError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json(&json).map_err(|e| match e {
            RasterError::Config(msg) => RasterError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject settings no run could use.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::Config` for zero workers, a timeout that is not a
    /// positive, representable duration, an empty output prefix, or an invalid default kernel.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(RasterError::Config("workers must be at least 1".to_string()));
        }
        self.item_timeout()?;
        if self.output_prefix.is_empty() {
            return Err(RasterError::Config(
                "output_prefix must not be empty".to_string(),
            ));
        }
        self.defaults
            .kernel
            .to_kernel()
            .map_err(|e| RasterError::Config(format!("default kernel: {}", e)))?;
        Ok(())
    }

    /// The configured operations with their defaults attached.
    pub fn sequence(&self) -> TransformSequence {
        TransformSequence::new(self.operations.clone()).with_defaults(self.defaults.clone())
    }

    /// # Errors
    ///
    /// Returns `RasterError::Config` if the timeout cannot be represented.
    pub fn batch_options(&self) -> Result<BatchOptions> {
        Ok(BatchOptions {
            workers: self.workers,
            item_timeout: self.item_timeout()?,
            output_prefix: self.output_prefix.clone(),
            limit: self.limit,
        })
    }

    /// A pipeline writing into `output_dir`.
    pub fn pipeline(&self, output_dir: impl Into<PathBuf>) -> Result<BatchPipeline> {
        Ok(BatchPipeline::new(self.sequence(), output_dir).with_options(self.batch_options()?))
    }

    fn item_timeout(&self) -> Result<Option<Duration>> {
        let Some(secs) = self.item_timeout_secs else {
            return Ok(None);
        };
        match Duration::try_from_secs_f64(secs) {
            Ok(budget) if !budget.is_zero() => Ok(Some(budget)),
            _ => Err(RasterError::Config(format!(
                "item_timeout_secs must be a positive duration, got {}",
                secs
            ))),
        }
    }
}
