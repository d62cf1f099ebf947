//! Huffman entropy coding of raw pixel data.
//!
//! The compressed stream is the concatenation of every symbol's code, packed
//! MSB-first with the final byte zero-padded. The padding is not marked, so a
//! plain [`decompress`] may decode it into spurious trailing symbols (all-zero
//! bits walk towards the leftmost leaf). [`Compressed`] records the symbol
//! count so [`decompress_exact`] can truncate them.

mod bitio;
mod tree;

pub use bitio::{BitReader, BitWriter};
pub use tree::{HuffmanNode, HuffmanTree};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bitmap::Image;
use crate::error::{BitmapError, Result};

/// Output of a compression call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compressed {
    pub bytes: Vec<u8>,
    pub tree: HuffmanTree,
    /// Number of symbols encoded, padding excluded.
    pub symbol_count: usize,
}

impl Compressed {
    /// Decode exactly the symbols that were encoded.
    pub fn decompress(&self) -> Result<Vec<u8>> {
        decompress_exact(&self.bytes, &self.tree, self.symbol_count)
    }

    /// Compressed size relative to the input, `1.0` for empty input.
    pub fn ratio(&self) -> f64 {
        if self.symbol_count == 0 {
            1.0
        } else {
            self.bytes.len() as f64 / self.symbol_count as f64
        }
    }
}

/// Compress the raw pixel buffer of `image`, row padding included.
pub fn compress(image: &Image) -> Compressed {
    let compressed = compress_bytes(image.pixels());
    info!(
        width = image.width(),
        height = image.height(),
        input = compressed.symbol_count,
        output = compressed.bytes.len(),
        "Compressed image"
    );
    compressed
}

pub fn compress_bytes(data: &[u8]) -> Compressed {
    let tree = HuffmanTree::from_data(data);
    let codes = tree.generate_codes();

    let unused: &[bool] = &[];
    let mut table = vec![unused; 256];
    for (&value, code) in &codes {
        table[usize::from(value)] = code.as_slice();
    }

    let mut writer = BitWriter::new();
    for &byte in data {
        writer.write_code(table[usize::from(byte)]);
    }
    debug!(symbols = codes.len(), bits = writer.bit_len(), "Encoded Huffman stream");

    Compressed {
        bytes: writer.finish(),
        tree,
        symbol_count: data.len(),
    }
}

/// Decode every complete code in `bytes`, padding included.
///
/// A walk that is still inside the tree when the bits run out emits nothing.
pub fn decompress(bytes: &[u8], tree: &HuffmanTree) -> Result<Vec<u8>> {
    decode(bytes, tree, usize::MAX)
}

/// Decode at most `count` symbols from `bytes`.
pub fn decompress_exact(bytes: &[u8], tree: &HuffmanTree, count: usize) -> Result<Vec<u8>> {
    decode(bytes, tree, count)
}

fn decode(bytes: &[u8], tree: &HuffmanTree, limit: usize) -> Result<Vec<u8>> {
    let Some(root) = tree.root() else {
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        return Err(BitmapError::InvalidArgument(
            "cannot decode data with an empty Huffman tree".to_string(),
        ));
    };

    let mut output = Vec::with_capacity(limit.min(bytes.len() * 8));
    let mut node = root;
    for bit in BitReader::new(bytes) {
        if output.len() >= limit {
            break;
        }
        node = match node {
            // A lone leaf consumes one bit per symbol.
            HuffmanNode::Leaf { .. } => node,
            HuffmanNode::Internal { left, right, .. } => {
                if bit {
                    right.as_ref()
                } else {
                    left.as_ref()
                }
            }
        };
        if let HuffmanNode::Leaf { value, .. } = node {
            output.push(*value);
            node = root;
        }
    }

    debug!(symbols = output.len(), "Decoded Huffman stream");
    Ok(output)
}
