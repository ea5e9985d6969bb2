use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rasterkit_core::generate::sample_overlay;
use rasterkit_core::{draw_all, generate_gradient, save};

/// Write a gradient, with the sample shapes on top when `shapes` is set.
pub fn gradient(width: u32, height: u32, shapes: bool, output: &Path) -> Result<()> {
    let mut image = generate_gradient(width, height)
        .with_context(|| format!("cannot generate a {}x{} gradient", width, height))?;
    if shapes {
        image = draw_all(&image, &sample_overlay());
    }

    save(&image, output).with_context(|| format!("failed to write {}", output.display()))?;
    info!("wrote {}x{} gradient to {}", width, height, output.display());
    Ok(())
}
