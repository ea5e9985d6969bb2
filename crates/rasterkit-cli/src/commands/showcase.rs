//! The demonstration set: one output per core capability, followed by a
//! batch run over the images just written.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use rasterkit_core::{
    apply_color_matrix, apply_preset, crop_center, draw_all, enhance, flip, has_glyph,
    merge_channels, paste, resize, rotate, sample_image, save, split_channels, thumbnail, to_grayscale,
    to_rgb, BatchOptions, BatchPipeline, Color, ColorMatrix, ColorMode, DrawStyle, Enhancement,
    FilterPreset, FlipAxis, PixelBuffer, Resampling, Shape, TransformSequence,
};

const FILTERS: [(FilterPreset, &str); 5] = [
    (FilterPreset::Blur, "blurred"),
    (FilterPreset::Sharpen, "sharpened"),
    (FilterPreset::Emboss, "embossed"),
    (FilterPreset::EdgeEnhance, "edge_enhanced"),
    (FilterPreset::Smooth, "smoothed"),
];

const ENHANCEMENTS: [(Enhancement, f32, &str); 4] = [
    (Enhancement::Brightness, 1.5, "bright_image.jpg"),
    (Enhancement::Contrast, 1.3, "contrast_image.jpg"),
    (Enhancement::Color, 1.5, "saturated_image.jpg"),
    (Enhancement::Sharpness, 2.0, "sharp_image.jpg"),
];

const THUMBNAIL_SIZES: [u32; 3] = [128, 64, 32];

/// Images batch-processed at the end of the showcase.
const BATCH_LIMIT: usize = 5;

struct Output<'a> {
    dir: &'a Path,
    written: Vec<PathBuf>,
}

impl Output<'_> {
    fn write(&mut self, name: &str, image: &PixelBuffer) -> Result<()> {
        let path = self.dir.join(name);
        save(image, &path).with_context(|| format!("failed to write {}", path.display()))?;
        info!("wrote {} ({}x{})", path.display(), image.width(), image.height());
        self.written.push(path);
        Ok(())
    }
}

/// Write the demonstration set into `out_dir` and return every file written.
pub fn showcase(out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create {}", out_dir.display()))?;
    let mut out = Output {
        dir: out_dir,
        written: Vec::new(),
    };

    let image = sample_image()?;
    out.write("sample_image.jpg", &image)?;

    out.write(
        "my_resized_image.jpg",
        &resize(&image, 200, 150, Resampling::Bilinear)?,
    )?;
    out.write(
        "rotated_image.jpg",
        &rotate(&image, 45.0, true, Resampling::Bilinear)?,
    )?;
    out.write("my_flipped_image.jpg", &flip(&image, FlipAxis::Horizontal))?;

    for (preset, name) in FILTERS {
        out.write(&format!("my_{}_image.jpg", name), &apply_preset(&image, preset))?;
    }

    for (kind, factor, name) in ENHANCEMENTS {
        out.write(name, &enhance(&image, kind, factor)?)?;
    }

    let grayscale = to_grayscale(&image)?;
    out.write("grayscale_image.jpg", &grayscale)?;
    let sepia = apply_color_matrix(&to_rgb(&grayscale)?, &ColorMatrix::sepia())?;
    out.write("sepia_image.jpg", &sepia)?;

    out.write("my_artistic_image.jpg", &composition()?)?;

    for size in THUMBNAIL_SIZES {
        let thumb = thumbnail(&image, size, size, Resampling::Lanczos3)?;
        out.write(&format!("thumbnail_{}x{}.jpg", size, size), &thumb)?;
    }

    let cropped = crop_center(&image, 0.5)?;
    out.write("cropped_image.jpg", &cropped)?;
    out.write("combined_image.jpg", &collage(&image, &cropped)?)?;

    let [r, g, b] = split_channels(&image)?;
    out.write("false_color_image.jpg", &merge_channels(&g, &b, &r)?)?;

    let mut written = out.written;
    let pipeline = BatchPipeline::new(
        TransformSequence::standard_batch(),
        out_dir.join("batch_processed"),
    )
    .with_options(BatchOptions {
        limit: Some(BATCH_LIMIT),
        ..BatchOptions::default()
    });
    let report = pipeline.run(&written)?;
    info!(
        "batch processed {} of {} images",
        report.succeeded(),
        report.total()
    );
    written.extend(report.outputs().into_iter().map(Path::to_path_buf));

    Ok(written)
}

/// Shapes, lines and text on a white 500x400 canvas.
pub fn composition() -> Result<PixelBuffer> {
    let canvas = PixelBuffer::filled(500, 400, ColorMode::Rgb, Color::WHITE)?;
    let magenta_stroke = DrawStyle {
        fill: Some(Color::rgb(255, 0, 255)),
        outline: None,
        stroke_width: 3,
    };

    let mut items = vec![
        (
            Shape::Rectangle {
                bounds: [50, 50, 150, 100],
            },
            DrawStyle::filled(Color::rgb(255, 0, 0)).with_outline(Color::BLACK, 2),
        ),
        (
            Shape::Ellipse {
                bounds: [200, 50, 300, 150],
            },
            DrawStyle::filled(Color::rgb(0, 255, 0)).with_outline(Color::BLACK, 2),
        ),
        (
            Shape::Polygon {
                points: vec![(350, 50), (400, 100), (450, 50), (450, 150), (350, 150)],
            },
            DrawStyle::filled(Color::rgb(0, 0, 255)).with_outline(Color::BLACK, 1),
        ),
        (
            Shape::Line {
                points: vec![(50, 200), (450, 200)],
            },
            magenta_stroke,
        ),
        (
            Shape::Line {
                points: vec![(250, 180), (250, 220)],
            },
            magenta_stroke,
        ),
    ];

    for (origin, text, color) in [
        ((150, 250), "RasterKit Demo", Color::BLACK),
        ((150, 280), "Image Processing", Color::gray(128)),
    ] {
        let missing = text.chars().filter(|&c| !has_glyph(c)).count();
        if missing > 0 {
            debug!("{} character(s) of {:?} have no glyph", missing, text);
        }
        items.push((
            Shape::Text {
                origin,
                text: text.to_string(),
            },
            DrawStyle::filled(color),
        ));
    }

    Ok(draw_all(&canvas, &items))
}

/// The full image, its center crop and a small copy pasted on a gray
/// 600x400 background. Pastes that overrun the edge are clipped.
fn collage(image: &PixelBuffer, cropped: &PixelBuffer) -> Result<PixelBuffer> {
    let background = PixelBuffer::filled(600, 400, ColorMode::Rgb, Color::gray(200))?;
    let small = resize(image, 150, 100, Resampling::Bilinear)?;

    let combined = paste(&background, image, 10, 10)?;
    let combined = paste(&combined, cropped, 420, 10)?;
    Ok(paste(&combined, &small, 10, 320)?)
}
