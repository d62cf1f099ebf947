//! Subcommand handlers.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use bitmap_engine::{
    HuffmanTree, Image, Kernel, KernelSpec, Operation, codec, compress, decompress_exact,
    interop, stego,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::Command;
use crate::config::Config;

/// Metadata stored next to a compressed pixel stream.
///
/// The original header is kept verbatim so bitmaps with trailing bytes after
/// the pixel rows decompress back to the same file.
#[derive(Debug, Serialize, Deserialize)]
struct TreeFile {
    header: Vec<u8>,
    symbol_count: usize,
    tree: HuffmanTree,
}

fn tree_path(output: &Path) -> PathBuf {
    output.with_extension("tree.json")
}

fn load(path: &Path) -> anyhow::Result<Image> {
    codec::load(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn save(image: &Image, path: &Path) -> anyhow::Result<()> {
    codec::save(image, path).with_context(|| format!("Failed to save {}", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

pub(crate) fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    match command {
        Command::Info { input } => {
            let image = load(&input)?;
            print!("{}", describe(&image));
        }
        Command::Create {
            output,
            width,
            height,
            fill,
        } => {
            let mut image = Image::create(width, height)?;
            if let Some(pixel) = fill {
                image.fill(pixel);
            }
            save(&image, &output)?;
        }
        Command::Colors {
            input,
            output,
            mode,
        } => {
            let image = load(&input)?;
            save(&Operation::AlterColors { mode }.apply(&image)?, &output)?;
        }
        Command::Kernel {
            input,
            output,
            preset,
            matrix,
            origin,
            edge,
        } => {
            let kernel = match (preset, matrix) {
                (Some(named), _) => KernelSpec::Named(named),
                (None, Some(path)) => {
                    let rows: Vec<Vec<f32>> = read_json(&path)?;
                    // Validate before touching the image.
                    Kernel::new(rows.clone())?;
                    KernelSpec::Custom(rows)
                }
                (None, None) => bail!("either --preset or --matrix is required"),
            };
            let op = Operation::ApplyKernel {
                kernel,
                origin: Some(origin.unwrap_or(config.origin)),
                edge: Some(edge.unwrap_or(config.edge)),
            };
            let image = load(&input)?;
            save(&op.apply(&image)?, &output)?;
        }
        Command::Rotate {
            input,
            output,
            degrees,
        } => {
            let image = load(&input)?;
            save(&Operation::Rotate { degrees }.apply(&image)?, &output)?;
        }
        Command::Resize {
            input,
            output,
            scale,
            smooth,
        } => {
            let op = Operation::Resize {
                scale,
                smooth: smooth.unwrap_or(config.smooth_resize),
            };
            let image = load(&input)?;
            save(&op.apply(&image)?, &output)?;
        }
        Command::Apply {
            input,
            output,
            operations,
        } => {
            let ops: Vec<Operation> = read_json(&operations)?;
            info!(count = ops.len(), "Applying operations");
            let image = load(&input)?;
            save(&bitmap_engine::apply_all(&image, &ops)?, &output)?;
        }
        Command::Hide {
            host,
            guest,
            output,
        } => {
            let encoded = stego::encrypt(&load(&host)?, &load(&guest)?)?;
            stego::save_encoded(&encoded, &output)
                .with_context(|| format!("Failed to save {}", output.display()))?;
        }
        Command::Reveal { input, output } => {
            let revealed = stego::decrypt(&input)
                .with_context(|| format!("Failed to reveal {}", input.display()))?;
            save(&revealed, &output)?;
        }
        Command::Compress { input, output } => {
            let image = load(&input)?;
            let compressed = compress(&image);
            fs::write(&output, &compressed.bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            let meta = TreeFile {
                header: image.header().to_vec(),
                symbol_count: compressed.symbol_count,
                tree: compressed.tree,
            };
            fs::write(tree_path(&output), serde_json::to_string(&meta)?)?;
            println!(
                "{} -> {} bytes",
                meta.symbol_count,
                compressed.bytes.len()
            );
        }
        Command::Decompress { input, output } => {
            let bytes =
                fs::read(&input).with_context(|| format!("Failed to read {}", input.display()))?;
            let meta: TreeFile = read_json(&tree_path(&input))?;
            let mut raw = meta.header;
            raw.extend(decompress_exact(&bytes, &meta.tree, meta.symbol_count)?);
            let image = codec::decode(&raw)
                .with_context(|| format!("Failed to rebuild bitmap from {}", input.display()))?;
            save(&image, &output)?;
        }
        Command::Export {
            input,
            output,
            quality,
        } => {
            let image = load(&input)?;
            let is_jpeg = output
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));
            if is_jpeg {
                interop::export_jpeg(&image, &output, quality.unwrap_or(config.jpeg_quality))?;
            } else {
                interop::export(&image, &output)?;
            }
        }
        Command::Import { input, output } => {
            let image = interop::import(&input)
                .with_context(|| format!("Failed to import {}", input.display()))?;
            save(&image, &output)?;
        }
        Command::Config => {
            for (key, value, description) in config.describe() {
                println!("{key}={value}\t# {description}");
            }
        }
    }
    Ok(())
}

fn describe(image: &Image) -> String {
    let signature = image.signature();
    format!(
        "signature:   {}\n\
         file size:   {}\n\
         data offset: {}\n\
         info header: {}\n\
         dimensions:  {}x{}\n\
         planes:      {}\n\
         depth:       {}\n\
         compression: {}\n\
         stride:      {}\n",
        String::from_utf8_lossy(&signature),
        image.file_size(),
        image.start_offset(),
        image.info_header_size(),
        image.width(),
        image.height(),
        image.color_planes(),
        image.color_depth(),
        image.compression(),
        image.stride(),
    )
}
