//! Batch processing of image files.
//!
//! A [`TransformSequence`] describes what to do to one image; a
//! [`BatchPipeline`] runs it over many files, isolates per-file failures and
//! reports the outcome of each file in input order.

mod batch;
mod ops;

pub use batch::{
    discover_images, is_supported_image, run, BatchJob, BatchOptions, BatchPipeline, BatchReport,
    JobStatus, DEFAULT_OUTPUT_PREFIX,
};
pub use ops::{standard_operations, Operation, OperationDefaults, ThumbnailBox, TransformSequence};
