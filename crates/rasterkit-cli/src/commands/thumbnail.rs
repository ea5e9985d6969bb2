use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use rasterkit_core::{load, save, PipelineConfig, Resampling};

/// Options left unset fall back to the configuration's defaults.
#[derive(Debug, Default)]
pub struct ThumbnailArgs {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub resampling: Option<Resampling>,
    pub config: Option<PathBuf>,
}

pub fn thumbnail(input: &Path, output: &Path, args: ThumbnailArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    let defaults = &config.defaults;
    let max_width = args.max_width.unwrap_or(defaults.thumbnail.max_width);
    let max_height = args.max_height.unwrap_or(defaults.thumbnail.max_height);
    let resampling = args.resampling.unwrap_or(defaults.resampling);

    let image = load(input).with_context(|| format!("failed to load {}", input.display()))?;
    let thumb = rasterkit_core::thumbnail(&image, max_width, max_height, resampling)?;
    save(&thumb, output).with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        "{} ({}x{}) -> {} ({}x{})",
        input.display(),
        image.width(),
        image.height(),
        output.display(),
        thumb.width(),
        thumb.height()
    );
    Ok(())
}
