//! `bmpkit`: command-line front end for the bitmap engine.
//!
//! Every subcommand reads its inputs from explicit paths and writes its result
//! to an explicit output path. Defaults for convolution, resizing, JPEG export
//! and logging come from `BMPKIT_*` environment variables (a `.env` file is
//! honored).

mod commands;
mod config;

use std::path::PathBuf;

use bitmap_engine::{ColorMode, EdgeProcessing, KernelOrigin, NamedKernel, Pixel};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "bmpkit", version, about = "Manipulate uncompressed 24-bit bitmaps")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the header fields of a bitmap
    Info {
        input: PathBuf,
    },
    /// Create a blank bitmap
    Create {
        output: PathBuf,
        width: usize,
        height: usize,
        /// Fill color as r,g,b (default: black)
        #[arg(long, value_parser = parse_rgb)]
        fill: Option<Pixel>,
    },
    /// Recolor a bitmap: grayscale, black_and_white, negative or dithered
    Colors {
        input: PathBuf,
        output: PathBuf,
        mode: ColorMode,
    },
    /// Convolve a bitmap with a built-in or custom kernel
    Kernel {
        input: PathBuf,
        output: PathBuf,
        /// Built-in kernel name (e.g. sharpen, gaussian_blur_3x3)
        #[arg(long, required_unless_present = "matrix")]
        preset: Option<NamedKernel>,
        /// JSON file holding a weight matrix, e.g. [[0,1,0],[1,-4,1],[0,1,0]]
        #[arg(long, conflicts_with = "preset")]
        matrix: Option<PathBuf>,
        /// Kernel origin (default: BMPKIT_ORIGIN)
        #[arg(long)]
        origin: Option<KernelOrigin>,
        /// Edge policy (default: BMPKIT_EDGE)
        #[arg(long)]
        edge: Option<EdgeProcessing>,
    },
    /// Rotate a bitmap by an angle in degrees
    Rotate {
        input: PathBuf,
        output: PathBuf,
        #[arg(allow_negative_numbers = true)]
        degrees: f64,
    },
    /// Scale a bitmap by a factor
    Resize {
        input: PathBuf,
        output: PathBuf,
        scale: f32,
        /// Box-blur before downscaling; `--smooth=false` turns it off
        /// (default: BMPKIT_SMOOTH_RESIZE)
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        smooth: Option<bool>,
    },
    /// Apply a JSON list of operations in order
    Apply {
        input: PathBuf,
        output: PathBuf,
        /// JSON file, e.g. [{"op":"rotate","degrees":90}]
        operations: PathBuf,
    },
    /// Hide one bitmap inside another
    Hide {
        host: PathBuf,
        guest: PathBuf,
        /// Composed bitmap; the guest size is written next to it as .json
        output: PathBuf,
    },
    /// Recover a hidden bitmap
    Reveal {
        input: PathBuf,
        output: PathBuf,
    },
    /// Huffman-compress the pixel data of a bitmap
    Compress {
        input: PathBuf,
        /// Packed bits; the tree is written next to it as .tree.json
        output: PathBuf,
    },
    /// Rebuild a bitmap from compressed pixel data
    Decompress {
        input: PathBuf,
        output: PathBuf,
    },
    /// Convert a bitmap to another format chosen by extension
    Export {
        input: PathBuf,
        output: PathBuf,
        /// JPEG quality (default: BMPKIT_JPEG_QUALITY)
        #[arg(long)]
        quality: Option<u8>,
    },
    /// Convert an image in another format to a 24-bit bitmap
    Import {
        input: PathBuf,
        output: PathBuf,
    },
    /// Show the resolved settings
    Config,
}

fn parse_rgb(s: &str) -> Result<Pixel, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [r, g, b] = parts.as_slice() else {
        return Err(format!("expected r,g,b but got {s:?}"));
    };
    let channel = |v: &str| v.parse::<u8>().map_err(|_| format!("{v:?} is not 0-255"));
    Ok(Pixel::new(channel(*r)?, channel(*g)?, channel(*b)?))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    commands::run(cli.command, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rgb() {
        assert_eq!(parse_rgb("255, 0,10").unwrap(), Pixel::new(255, 0, 10));
        assert!(parse_rgb("1,2").is_err());
        assert!(parse_rgb("1,2,300").is_err());
    }

    #[test]
    fn test_negative_rotation_parses() {
        let cli = Cli::try_parse_from(["bmpkit", "rotate", "a.bmp", "b.bmp", "-90"]).unwrap();
        assert!(matches!(cli.command, Command::Rotate { degrees, .. } if degrees == -90.0));
    }

    #[test]
    fn test_smooth_flag_forms() {
        let smooth_of = |args: &[&str]| {
            let mut argv = vec!["bmpkit", "resize", "a.bmp", "b.bmp", "0.5"];
            argv.extend_from_slice(args);
            match Cli::try_parse_from(argv).unwrap().command {
                Command::Resize { smooth, .. } => smooth,
                _ => panic!("expected resize"),
            }
        };
        assert_eq!(smooth_of(&[]), None);
        assert_eq!(smooth_of(&["--smooth"]), Some(true));
        assert_eq!(smooth_of(&["--smooth=false"]), Some(false));
    }

    #[test]
    fn test_kernel_requires_a_source() {
        assert!(Cli::try_parse_from(["bmpkit", "kernel", "a.bmp", "b.bmp"]).is_err());
        let cli =
            Cli::try_parse_from(["bmpkit", "kernel", "a.bmp", "b.bmp", "--preset", "sharpen"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Command::Kernel {
                preset: Some(NamedKernel::Sharpen),
                ..
            }
        ));
    }

    #[test]
    fn test_color_mode_parses() {
        let cli =
            Cli::try_parse_from(["bmpkit", "colors", "a.bmp", "b.bmp", "black-and-white"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Colors {
                mode: ColorMode::BlackAndWhite,
                ..
            }
        ));
    }
}
