//! rasterkit - command line front end for rasterkit-core
//!
//! Subcommands:
//!   gradient   - write the procedural gradient, optionally with shapes
//!   showcase   - write the full demonstration set into a directory
//!   thumbnail  - fit an image into a bounding box
//!   batch      - run a transform sequence over a directory of images
//!   export     - print an image as a numeric array

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rasterkit_core::Resampling;

#[derive(Parser, Debug)]
#[command(name = "rasterkit", version, about = "Raster image generation and processing")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Write an RGB gradient image
    Gradient {
        #[arg(long, default_value_t = 400)]
        width: u32,
        #[arg(long, default_value_t = 300)]
        height: u32,
        /// Output file (.png, .jpg or .jpeg)
        #[arg(short, long)]
        output: PathBuf,
        /// Overlay the sample disc and square
        #[arg(long)]
        shapes: bool,
    },
    /// Generate the demonstration image set
    Showcase {
        /// Directory to write into (created if missing)
        out_dir: PathBuf,
    },
    /// Downscale an image to fit a bounding box
    Thumbnail {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        max_width: Option<u32>,
        #[arg(long)]
        max_height: Option<u32>,
        #[arg(long, value_enum)]
        resampling: Option<ResamplingArg>,
        /// Pipeline configuration whose defaults fill unset options
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Process every image in a directory
    Batch {
        input_dir: PathBuf,
        output_dir: PathBuf,
        /// Pipeline configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Worker threads, overrides the configuration
        #[arg(long)]
        workers: Option<usize>,
        /// Maximum number of images, overrides the configuration
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print an image as a numeric array (JSON)
    Export {
        input: PathBuf,
        /// Include every sample, not just the shape
        #[arg(long)]
        full: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ResamplingArg {
    Nearest,
    Bilinear,
    Lanczos,
}

impl From<ResamplingArg> for Resampling {
    fn from(arg: ResamplingArg) -> Self {
        match arg {
            ResamplingArg::Nearest => Resampling::Nearest,
            ResamplingArg::Bilinear => Resampling::Bilinear,
            ResamplingArg::Lanczos => Resampling::Lanczos3,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(command: Cmd) -> anyhow::Result<()> {
    match command {
        Cmd::Gradient {
            width,
            height,
            output,
            shapes,
        } => commands::generate::gradient(width, height, shapes, &output),
        Cmd::Showcase { out_dir } => {
            let written = commands::showcase::showcase(&out_dir)?;
            println!("Wrote {} files to {}", written.len(), out_dir.display());
            Ok(())
        }
        Cmd::Thumbnail {
            input,
            output,
            max_width,
            max_height,
            resampling,
            config,
        } => commands::thumbnail::thumbnail(
            &input,
            &output,
            commands::thumbnail::ThumbnailArgs {
                max_width,
                max_height,
                resampling: resampling.map(Resampling::from),
                config,
            },
        ),
        Cmd::Batch {
            input_dir,
            output_dir,
            config,
            workers,
            limit,
        } => {
            let report = commands::batch::batch(
                &input_dir,
                &output_dir,
                config.as_deref(),
                workers,
                limit,
            )?;
            print!("{}", commands::batch::summary(&report, &output_dir));
            Ok(())
        }
        Cmd::Export { input, full } => {
            println!("{}", commands::export::export(&input, full)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gradient_defaults() {
        let cli = Cli::try_parse_from(["rasterkit", "gradient", "-o", "out.png"]).unwrap();
        match cli.command {
            Cmd::Gradient {
                width,
                height,
                output,
                shapes,
            } => {
                assert_eq!((width, height), (400, 300));
                assert_eq!(output, PathBuf::from("out.png"));
                assert!(!shapes);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_thumbnail_resampling() {
        let cli = Cli::try_parse_from([
            "rasterkit",
            "thumbnail",
            "in.jpg",
            "-o",
            "thumb.jpg",
            "--max-width",
            "64",
            "--resampling",
            "lanczos",
        ])
        .unwrap();
        match cli.command {
            Cmd::Thumbnail {
                max_width,
                max_height,
                resampling,
                ..
            } => {
                assert_eq!(max_width, Some(64));
                assert_eq!(max_height, None);
                assert_eq!(resampling.map(Resampling::from), Some(Resampling::Lanczos3));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_batch_overrides() {
        let cli = Cli::try_parse_from([
            "rasterkit",
            "batch",
            "photos",
            "processed",
            "--workers",
            "4",
            "--limit",
            "5",
        ])
        .unwrap();
        match cli.command {
            Cmd::Batch {
                input_dir,
                workers,
                limit,
                config,
                ..
            } => {
                assert_eq!(input_dir, PathBuf::from("photos"));
                assert_eq!(workers, Some(4));
                assert_eq!(limit, Some(5));
                assert!(config.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_resampling() {
        assert!(Cli::try_parse_from([
            "rasterkit",
            "thumbnail",
            "in.jpg",
            "-o",
            "t.jpg",
            "--resampling",
            "bicubic",
        ])
        .is_err());
    }

    #[test]
    fn test_gradient_requires_output() {
        assert!(Cli::try_parse_from(["rasterkit", "gradient"]).is_err());
    }
}
