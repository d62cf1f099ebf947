//! Manipulation engine for uncompressed 24-bit bitmaps.
//!
//! Parses and writes the 54-byte BMP container, exposes checked pixel
//! addressing over the packed BGR buffer, and implements the pixel-level
//! transformations: color remapping, convolution filtering, rotation and
//! resizing, nibble steganography and Huffman compression.
//!
//! Every transformation takes an [`Image`] by reference and returns a new one;
//! inputs are never mutated.

pub mod bitmap;
pub mod codec;
pub mod colors;
pub mod convolution;
pub mod endian;
pub mod error;
pub mod huffman;
pub mod interop;
pub mod ops;
pub mod pixel;
pub mod resize;
pub mod rotate;
pub mod stego;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use bitmap::Image;
pub use codec::{load, save};
pub use colors::{ColorMode, alter_colors};
pub use convolution::{
    EdgeProcessing, Kernel, KernelOrigin, NamedKernel, apply, apply_kernel, apply_named,
};
pub use error::{BitmapError, Result};
pub use huffman::{
    Compressed, HuffmanNode, HuffmanTree, compress, compress_bytes, decompress, decompress_exact,
};
pub use ops::{KernelSpec, Operation, apply_all};
pub use pixel::Pixel;
pub use resize::{resize, resize_smooth, resize_to};
pub use rotate::rotate;
pub use stego::{Encoded, GuestDimensions, decrypt, encrypt, reveal, save_encoded};

/// Size in bytes of the file header plus the BITMAPINFOHEADER.
pub const HEADER_LEN: usize = 54;

/// The only supported color depth, in bits per pixel.
pub const COLOR_DEPTH: u16 = 24;
