//! File-level batch runner.
//!
//! Each input moves through `Pending -> Processing -> Succeeded | Failed`.
//! Load, transform and save errors are recorded on the job and never stop
//! the run; only failing to create the output directory (or the worker pool)
//! is a run-level error.
//!
//! Outputs are named `output_prefix + input file name`. When two inputs
//! share a file name, the later one fails with `OutputConflict` instead of
//! overwriting the earlier output.
//!
//! With `workers > 1` jobs run on a rayon pool, and the report still lists
//! them in input order. With an `item_timeout`, loading and transforming run
//! on a helper thread; an item that overruns is reported as failed and its
//! result, if it ever arrives, is discarded without writing output.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rayon::prelude::*;

use super::ops::TransformSequence;
use crate::buffer::PixelBuffer;
use crate::codec;
use crate::error::{RasterError, Result};

/// Prefix for output file names unless configured otherwise.
pub const DEFAULT_OUTPUT_PREFIX: &str = "processed_";

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    Pending,
    Processing,
    Succeeded { output: PathBuf },
    Failed { reason: RasterError },
}

/// One input file and its outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchJob {
    pub input: PathBuf,
    pub status: JobStatus,
}

impl BatchJob {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            status: JobStatus::Pending,
        }
    }

    fn start(&mut self) {
        self.status = JobStatus::Processing;
    }

    fn finish(&mut self, result: Result<PathBuf>) {
        self.status = match result {
            Ok(output) => JobStatus::Succeeded { output },
            Err(reason) => JobStatus::Failed { reason },
        };
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.status, JobStatus::Succeeded { .. })
    }
}

/// Outcome of a batch run, one job per attempted input in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub jobs: Vec<BatchJob>,
    pub elapsed: Duration,
}

impl BatchReport {
    /// Number of jobs that produced an output file.
    pub fn succeeded(&self) -> usize {
        self.jobs.iter().filter(|job| job.succeeded()).count()
    }

    /// Number of attempted jobs.
    pub fn total(&self) -> usize {
        self.jobs.len()
    }

    /// Failed inputs with their reasons, in input order.
    pub fn failures(&self) -> Vec<(&Path, &RasterError)> {
        self.jobs
            .iter()
            .filter_map(|job| match &job.status {
                JobStatus::Failed { reason } => Some((job.input.as_path(), reason)),
                _ => None,
            })
            .collect()
    }

    /// Output files written by successful jobs.
    pub fn outputs(&self) -> Vec<&Path> {
        self.jobs
            .iter()
            .filter_map(|job| match &job.status {
                JobStatus::Succeeded { output } => Some(output.as_path()),
                _ => None,
            })
            .collect()
    }
}

/// Tuning knobs for [`BatchPipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    /// Worker threads; 1 runs sequentially on the calling thread.
    pub workers: usize,
    /// Wall-clock budget for loading and transforming one item.
    pub item_timeout: Option<Duration>,
    /// Prepended to the input file name to form the output file name.
    pub output_prefix: String,
    /// Process at most this many inputs.
    pub limit: Option<usize>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            item_timeout: None,
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            limit: None,
        }
    }
}

/// Applies one transform sequence to many files.
#[derive(Debug, Clone)]
pub struct BatchPipeline {
    sequence: TransformSequence,
    output_dir: PathBuf,
    options: BatchOptions,
}

impl BatchPipeline {
    pub fn new(sequence: TransformSequence, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            sequence,
            output_dir: output_dir.into(),
            options: BatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Process `files` in order.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::Io` if the output directory cannot be created and
    /// `RasterError::Config` if the worker pool cannot be started. Per-file
    /// errors are reported in the returned [`BatchReport`] instead.
    pub fn run(&self, files: &[PathBuf]) -> Result<BatchReport> {
        let started = Instant::now();
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| RasterError::Io(format!("{}: {}", self.output_dir.display(), e)))?;

        let files = match self.options.limit {
            Some(limit) => &files[..limit.min(files.len())],
            None => files,
        };
        info!(
            "processing {} image(s) into {} with {} worker(s)",
            files.len(),
            self.output_dir.display(),
            self.options.workers.max(1)
        );

        let targets = self.plan_outputs(files);
        let jobs: Vec<BatchJob> = if self.options.workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.workers)
                .build()
                .map_err(|e| RasterError::Config(format!("cannot start worker pool: {}", e)))?;
            pool.install(|| {
                files
                    .par_iter()
                    .zip(targets.par_iter())
                    .map(|(file, target)| self.process(file, target))
                    .collect()
            })
        } else {
            files
                .iter()
                .zip(&targets)
                .map(|(file, target)| self.process(file, target))
                .collect()
        };

        let report = BatchReport {
            jobs,
            elapsed: started.elapsed(),
        };
        info!(
            "batch finished: {}/{} succeeded in {:.2?}",
            report.succeeded(),
            report.total(),
            report.elapsed
        );
        Ok(report)
    }

    fn process(&self, input: &Path, target: &Result<PathBuf>) -> BatchJob {
        let mut job = BatchJob::new(input);
        job.start();
        debug!("processing {}", input.display());

        let result = target.clone().and_then(|output| {
            let image = self.render(input)?;
            codec::save(&image, &output)?;
            Ok(output)
        });

        match &result {
            Ok(output) => info!("{} -> {}", input.display(), output.display()),
            Err(err) => warn!("{} failed: {}", input.display(), err),
        }
        job.finish(result);
        job
    }

    /// Load and transform one input, within the time budget if one is set.
    fn render(&self, input: &Path) -> Result<PixelBuffer> {
        let Some(budget) = self.options.item_timeout else {
            return load_and_apply(&self.sequence, input);
        };

        let (tx, rx) = mpsc::channel();
        let sequence = self.sequence.clone();
        let path = input.to_path_buf();
        thread::Builder::new()
            .name("rasterkit-item".to_string())
            .spawn(move || {
                // The receiver is gone if the item already timed out
                let _ = tx.send(load_and_apply(&sequence, &path));
            })?;

        match rx.recv_timeout(budget) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(RasterError::Timeout {
                millis: budget_millis(budget),
            }),
            Err(RecvTimeoutError::Disconnected) => Err(RasterError::Aborted(format!(
                "worker for {} exited without a result",
                input.display()
            ))),
        }
    }

    /// Output path per input, in order. Only the first input claiming a path
    /// gets it; later ones carry an `OutputConflict`.
    fn plan_outputs(&self, files: &[PathBuf]) -> Vec<Result<PathBuf>> {
        let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
        files
            .iter()
            .map(|input| {
                let output = self.output_path(input)?;
                if let Some(first) = claimed.get(&output) {
                    return Err(RasterError::OutputConflict {
                        output: output.display().to_string(),
                        first: first.display().to_string(),
                    });
                }
                claimed.insert(output.clone(), input.as_path());
                Ok(output)
            })
            .collect()
    }

    fn output_path(&self, input: &Path) -> Result<PathBuf> {
        let name = input
            .file_name()
            .ok_or_else(|| RasterError::Io(format!("{}: not a file", input.display())))?;
        let mut file_name = std::ffi::OsString::from(&self.options.output_prefix);
        file_name.push(name);
        Ok(self.output_dir.join(file_name))
    }
}

fn budget_millis(budget: Duration) -> u64 {
    u64::try_from(budget.as_millis()).unwrap_or(u64::MAX)
}

fn load_and_apply(sequence: &TransformSequence, input: &Path) -> Result<PixelBuffer> {
    let image = codec::load(input)?;
    sequence.apply(&image)
}

/// Run `sequence` over `files` sequentially with default options.
pub fn run(files: &[PathBuf], sequence: &TransformSequence, output_dir: impl Into<PathBuf>) -> Result<BatchReport> {
    BatchPipeline::new(sequence.clone(), output_dir).run(files)
}

/// Whether `path` has a recognized image extension (case-insensitive).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|known| e.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Image files directly inside `dir`, sorted by path.
pub fn discover_images(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries =
        std::fs::read_dir(dir).map_err(|e| RasterError::Io(format!("{}: {}", dir.display(), e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_supported_image(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::save;
    use crate::filter::KernelSpec;
    use crate::generate::generate_gradient;
    use crate::pipeline::Operation;
    use crate::transform::Resampling;
    use log::LevelFilter;

    fn init_logging() {
        let _ = env_logger::builder()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    /// Five inputs in a fresh directory; the third is not an image.
    fn inputs_with_corrupt_third(dir: &Path) -> Vec<PathBuf> {
        let image = generate_gradient(64, 48).unwrap();
        let mut files = Vec::new();
        for i in 1..=5 {
            let path = dir.join(format!("image_{}.png", i));
            if i == 3 {
                std::fs::write(&path, b"this is not a png").unwrap();
            } else {
                save(&image, &path).unwrap();
            }
            files.push(path);
        }
        files
    }

    fn small_sequence() -> TransformSequence {
        TransformSequence::new(vec![Operation::Resize {
            width: 32,
            height: 24,
            resampling: Some(Resampling::Bilinear),
        }])
    }

    #[test]
    fn test_corrupt_item_is_isolated() {
        init_logging();
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let files = inputs_with_corrupt_third(input.path());

        let report = run(&files, &TransformSequence::standard_batch(), output.path()).unwrap();

        assert_eq!(report.total(), 5);
        assert_eq!(report.succeeded(), 4);

        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, files[2].as_path());
        assert!(matches!(failures[0].1, RasterError::Io(_)));

        let written = std::fs::read_dir(output.path()).unwrap().count();
        assert_eq!(written, 4);
        for path in report.outputs() {
            assert_eq!(codec::load(path).unwrap().dimensions(), (300, 200));
        }
    }

    #[test]
    fn test_output_names_use_prefix() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let files = inputs_with_corrupt_third(input.path());

        let report = run(&files[..1], &small_sequence(), output.path()).unwrap();

        assert_eq!(
            report.outputs(),
            vec![output.path().join("processed_image_1.png").as_path()]
        );
    }

    #[test]
    fn test_parallel_keeps_input_order() {
        init_logging();
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let files = inputs_with_corrupt_third(input.path());

        let pipeline = BatchPipeline::new(small_sequence(), output.path()).with_options(BatchOptions {
            workers: 3,
            output_prefix: "thumb_".to_string(),
            ..BatchOptions::default()
        });
        let report = pipeline.run(&files).unwrap();

        let inputs: Vec<&PathBuf> = report.jobs.iter().map(|job| &job.input).collect();
        assert_eq!(inputs, files.iter().collect::<Vec<_>>());
        assert_eq!(report.succeeded(), 4);
        assert!(!report.jobs[2].succeeded());
        assert!(output.path().join("thumb_image_5.png").exists());
    }

    #[test]
    fn test_limit_caps_items() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let files = inputs_with_corrupt_third(input.path());

        let pipeline = BatchPipeline::new(small_sequence(), output.path()).with_options(BatchOptions {
            limit: Some(2),
            ..BatchOptions::default()
        });
        let report = pipeline.run(&files).unwrap();

        assert_eq!(report.total(), 2);
        assert_eq!(report.succeeded(), 2);
    }

    #[test]
    fn test_timeout_marks_item_failed() {
        init_logging();
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let path = input.path().join("large.png");
        save(&generate_gradient(400, 300).unwrap(), &path).unwrap();

        let slow = TransformSequence::new(vec![
            Operation::Rotate {
                degrees: 33.0,
                expand: Some(true),
                resampling: Some(Resampling::Lanczos3),
            },
            Operation::Rotate {
                degrees: -33.0,
                expand: Some(true),
                resampling: Some(Resampling::Lanczos3),
            },
        ]);
        let pipeline = BatchPipeline::new(slow, output.path()).with_options(BatchOptions {
            item_timeout: Some(Duration::ZERO),
            ..BatchOptions::default()
        });
        let report = pipeline.run(&[path]).unwrap();

        assert_eq!(report.succeeded(), 0);
        assert!(matches!(
            report.failures()[0].1,
            RasterError::Timeout { .. }
        ));
        assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_timeout_millis_saturate() {
        assert_eq!(budget_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(budget_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_same_file_name_in_two_dirs_conflicts() {
        let first_dir = tempfile::tempdir().unwrap();
        let second_dir = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let image = generate_gradient(40, 30).unwrap();
        let files = vec![
            first_dir.path().join("photo.png"),
            second_dir.path().join("photo.png"),
            second_dir.path().join("other.png"),
        ];
        for file in &files {
            save(&image, file).unwrap();
        }

        for workers in [1, 2] {
            let pipeline = BatchPipeline::new(small_sequence(), output.path())
                .with_options(BatchOptions {
                    workers,
                    ..BatchOptions::default()
                });
            let report = pipeline.run(&files).unwrap();

            assert_eq!(report.succeeded(), 2);
            assert!(report.jobs[0].succeeded());
            assert!(report.jobs[2].succeeded());
            match &report.jobs[1].status {
                JobStatus::Failed {
                    reason: RasterError::OutputConflict { output: out, first },
                } => {
                    assert!(out.ends_with("processed_photo.png"));
                    assert_eq!(first, &files[0].display().to_string());
                }
                other => panic!("expected an output conflict, got {:?}", other),
            }
        }
        assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_extreme_custom_kernel_does_not_abort_run() {
        init_logging();
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let image = generate_gradient(16, 12).unwrap();
        let files: Vec<PathBuf> = (1..=3)
            .map(|i| {
                let path = input.path().join(format!("tile_{}.png", i));
                save(&image, &path).unwrap();
                path
            })
            .collect();

        let sequence = TransformSequence::new(vec![Operation::Filter {
            kernel: Some(KernelSpec::Custom {
                width: 3,
                height: 3,
                weights: vec![100_000_000; 9],
                divisor: 1,
                offset: 0,
            }),
        }]);
        let report = run(&files, &sequence, output.path()).unwrap();

        assert_eq!(report.succeeded(), 3);
        // Every non-black neighborhood saturates to white
        let out = codec::load(report.outputs()[0]).unwrap();
        assert_eq!(out.get(15, 11).unwrap(), &[255, 255, 255]);
    }

    #[test]
    fn test_generous_timeout_succeeds() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let files = inputs_with_corrupt_third(input.path());

        let pipeline = BatchPipeline::new(small_sequence(), output.path()).with_options(BatchOptions {
            item_timeout: Some(Duration::from_secs(60)),
            ..BatchOptions::default()
        });
        let report = pipeline.run(&files).unwrap();

        assert_eq!(report.succeeded(), 4);
        assert!(matches!(report.failures()[0].1, RasterError::Io(_)));
    }

    #[test]
    fn test_creates_missing_output_dir() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("batch").join("out");

        let report = run(&[], &small_sequence(), &nested).unwrap();

        assert_eq!(report.total(), 0);
        assert!(nested.is_dir());
    }

    #[test]
    fn test_missing_input_is_io_failure() {
        let output = tempfile::tempdir().unwrap();
        let missing = output.path().join("nope.jpg");

        let report = run(&[missing], &small_sequence(), output.path()).unwrap();
        assert!(matches!(report.failures()[0].1, RasterError::Io(_)));
    }

    #[test]
    fn test_job_lifecycle() {
        let mut job = BatchJob::new("a.png");
        assert_eq!(job.status, JobStatus::Pending);

        job.start();
        assert_eq!(job.status, JobStatus::Processing);

        job.finish(Err(RasterError::Io("boom".to_string())));
        assert!(!job.succeeded());
        assert!(matches!(job.status, JobStatus::Failed { .. }));
    }

    #[test]
    fn test_discover_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.JPG", "a.png", "c.jpeg", "notes.txt", "d.gif"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let found = discover_images(dir.path()).unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.png", "b.JPG", "c.jpeg"]);
    }

    #[test]
    fn test_discover_missing_dir() {
        assert!(matches!(
            discover_images("/nonexistent/rasterkit/input"),
            Err(RasterError::Io(_))
        ));
    }
}
