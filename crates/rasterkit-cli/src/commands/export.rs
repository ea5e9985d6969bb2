use std::path::Path;

use anyhow::{Context, Result};
use rasterkit_core::load;
use serde_json::json;

/// Render an image as JSON: just its shape, or the full sample array.
pub fn export(input: &Path, full: bool) -> Result<String> {
    let image = load(input).with_context(|| format!("failed to load {}", input.display()))?;
    let array = image.to_numeric_array();

    let value = if full {
        serde_json::to_value(&array)?
    } else {
        json!({
            "width": array.width,
            "height": array.height,
            "channels": array.channels,
            "samples": array.data.len(),
        })
    };
    Ok(serde_json::to_string(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rasterkit_core::{save, ColorMode, NumericArray, PixelBuffer};

    fn write_image(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("tiny.png");
        let image = PixelBuffer::from_raw(2, 1, ColorMode::Grayscale, vec![10, 20]).unwrap();
        save(&image, &path).unwrap();
        path
    }

    #[test]
    fn test_export_header() {
        let dir = tempfile::tempdir().unwrap();
        let out = export(&write_image(dir.path()), false).unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["width"], 2);
        assert_eq!(value["channels"], 1);
        assert_eq!(value["samples"], 2);
    }

    #[test]
    fn test_export_full_array() {
        let dir = tempfile::tempdir().unwrap();
        let out = export(&write_image(dir.path()), true).unwrap();

        let array: NumericArray = serde_json::from_str(&out).unwrap();
        assert_eq!(array.data, vec![10, 20]);
        assert_eq!(array.into_buffer().unwrap().mode(), ColorMode::Grayscale);
    }

    #[test]
    fn test_export_missing_file() {
        assert!(export(Path::new("/nonexistent/rasterkit.png"), false).is_err());
    }
}
