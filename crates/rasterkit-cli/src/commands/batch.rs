use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use rasterkit_core::{discover_images, BatchReport, PipelineConfig};

/// Run the configured pipeline over every image in `input_dir`.
///
/// Command line `workers` and `limit` override the configuration.
pub fn batch(
    input_dir: &Path,
    output_dir: &Path,
    config: Option<&Path>,
    workers: Option<usize>,
    limit: Option<usize>,
) -> Result<BatchReport> {
    let mut config = match config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(workers) = workers {
        config.workers = workers;
    }
    if limit.is_some() {
        config.limit = limit;
    }
    config.validate()?;

    let files = discover_images(input_dir)
        .with_context(|| format!("cannot list images in {}", input_dir.display()))?;
    if files.is_empty() {
        warn!("no images found in {}", input_dir.display());
    }

    config
        .pipeline(output_dir)?
        .run(&files)
        .with_context(|| format!("batch into {} failed", output_dir.display()))
}

/// Human-readable report: one line per failure, then the totals.
pub fn summary(report: &BatchReport, output_dir: &Path) -> String {
    let mut out = String::new();
    for (input, reason) in report.failures() {
        let _ = writeln!(out, "failed: {}: {}", input.display(), reason);
    }
    let _ = writeln!(
        out,
        "Batch processed {} of {} images into {}",
        report.succeeded(),
        report.total(),
        output_dir.display()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rasterkit_core::{generate_gradient, load, save};

    fn populate(dir: &Path, count: usize) {
        let image = generate_gradient(80, 60).unwrap();
        for i in 0..count {
            save(&image, dir.join(format!("photo_{}.jpg", i))).unwrap();
        }
        std::fs::write(dir.join("readme.txt"), "not an image").unwrap();
    }

    #[test]
    fn test_batch_standard_recipe() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        populate(input.path(), 3);

        let report = batch(input.path(), output.path(), None, None, None).unwrap();

        assert_eq!((report.succeeded(), report.total()), (3, 3));
        let first = output.path().join("processed_photo_0.jpg");
        assert_eq!(load(first).unwrap().dimensions(), (300, 200));
        assert!(summary(&report, output.path()).contains("Batch processed 3 of 3 images"));
    }

    #[test]
    fn test_batch_overrides_and_config() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        populate(input.path(), 4);
        let config = input.path().join("pipeline.json");
        std::fs::write(
            &config,
            r#"{"operations": [{"op": "grayscale"}], "output_prefix": "gray_"}"#,
        )
        .unwrap();

        let report = batch(input.path(), output.path(), Some(&config), Some(2), Some(2)).unwrap();

        assert_eq!(report.total(), 2);
        let gray = load(output.path().join("gray_photo_1.jpg")).unwrap();
        assert_eq!(gray.mode(), rasterkit_core::ColorMode::Grayscale);
    }

    #[test]
    fn test_summary_lists_failures() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        populate(input.path(), 1);
        std::fs::write(input.path().join("broken.png"), b"garbage").unwrap();

        let report = batch(input.path(), output.path(), None, None, None).unwrap();
        let text = summary(&report, output.path());

        assert!(text.contains("failed: "));
        assert!(text.contains("broken.png"));
        assert!(text.contains("Batch processed 1 of 2 images"));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        assert!(batch(input.path(), output.path(), None, Some(0), None).is_err());
    }

    #[test]
    fn test_missing_input_dir() {
        let output = tempfile::tempdir().unwrap();
        let err = batch(Path::new("/nonexistent/photos"), output.path(), None, None, None).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/photos"));
    }
}
