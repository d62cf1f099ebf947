//! The [`Image`] entity: a 54-byte header plus a packed, row-padded BGR buffer.
//!
//! Width, height, depth and sizes are never stored as separate fields; every
//! accessor decodes the header bytes at its fixed offset.

use tracing::debug;

use crate::endian::{read_i32, read_u16, read_u32, write_i32, write_u16, write_u32};
use crate::error::{BitmapError, Result};
use crate::pixel::Pixel;
use crate::{COLOR_DEPTH, HEADER_LEN};

/// Byte offsets of the header fields.
pub mod field {
    pub const SIGNATURE: usize = 0;
    pub const FILE_SIZE: usize = 2;
    pub const START_OFFSET: usize = 10;
    pub const INFO_HEADER_SIZE: usize = 14;
    pub const WIDTH: usize = 18;
    pub const HEIGHT: usize = 22;
    pub const COLOR_PLANES: usize = 26;
    pub const COLOR_DEPTH: usize = 28;
    pub const COMPRESSION: usize = 30;
    pub const IMAGE_SIZE: usize = 34;
}

/// File signature ("BM").
pub const SIGNATURE: [u8; 2] = *b"BM";

/// Size of the BITMAPINFOHEADER written by [`Image::create`].
pub const INFO_HEADER_SIZE: u32 = 40;

const BYTES_PER_PIXEL: usize = 3;

/// Row size in bytes for a `width`-pixel row at `depth` bits per pixel,
/// rounded up to a multiple of four.
pub fn stride_for(width: usize, depth: u16) -> usize {
    (width * usize::from(depth) / 8 + 3) / 4 * 4
}

/// An uncompressed 24-bit bitmap.
///
/// `Clone` copies both buffers, so a duplicate never shares storage with the
/// image it was made from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    header: [u8; HEADER_LEN],
    pixels: Vec<u8>,
}

impl Image {
    /// Allocate a black `width` x `height` canvas with a fully populated header.
    pub fn create(width: usize, height: usize) -> Result<Self> {
        if width < 1 || height < 1 {
            return Err(BitmapError::InvalidArgument(format!(
                "width and height must be at least 1, got {width}x{height}"
            )));
        }
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(BitmapError::InvalidArgument(format!(
                "dimensions {width}x{height} do not fit in a bitmap header"
            )));
        };

        let data_len = stride_for(width, COLOR_DEPTH)
            .checked_mul(height)
            .and_then(|len| u32::try_from(len).ok())
            .filter(|len| len.checked_add(HEADER_LEN as u32).is_some())
            .ok_or_else(|| {
                BitmapError::InvalidArgument(format!("{width}x{height} bitmap is too large"))
            })?;

        let mut header = [0u8; HEADER_LEN];
        header[field::SIGNATURE..field::SIGNATURE + 2].copy_from_slice(&SIGNATURE);
        write_u32(&mut header, field::FILE_SIZE, HEADER_LEN as u32 + data_len);
        write_u32(&mut header, field::START_OFFSET, HEADER_LEN as u32);
        write_u32(&mut header, field::INFO_HEADER_SIZE, INFO_HEADER_SIZE);
        write_i32(&mut header, field::WIDTH, w);
        write_i32(&mut header, field::HEIGHT, h);
        write_u16(&mut header, field::COLOR_PLANES, 1);
        write_u16(&mut header, field::COLOR_DEPTH, COLOR_DEPTH);
        write_u32(&mut header, field::IMAGE_SIZE, data_len);

        debug!(width, height, data_len, "Allocated blank bitmap");

        Ok(Self {
            header,
            pixels: vec![0; data_len as usize],
        })
    }

    /// Wrap raw bottom-up BGR rows (padding included) in a fresh header.
    pub fn from_pixel_data(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let mut image = Self::create(width, height)?;
        if data.len() != image.pixels.len() {
            return Err(BitmapError::InvalidArgument(format!(
                "{width}x{height} bitmap needs {} bytes of pixel data, got {}",
                image.pixels.len(),
                data.len()
            )));
        }
        image.pixels = data;
        Ok(image)
    }

    /// Assemble an image from buffers the codec has already validated.
    pub(crate) fn from_parts(header: [u8; HEADER_LEN], pixels: Vec<u8>) -> Self {
        Self { header, pixels }
    }

    /// Deep copy of this image.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    pub fn header(&self) -> &[u8; HEADER_LEN] {
        &self.header
    }

    /// Raw pixel buffer: bottom-up rows, BGR, padded to the stride.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn signature(&self) -> [u8; 2] {
        [self.header[0], self.header[1]]
    }

    pub fn file_size(&self) -> u32 {
        read_u32(&self.header, field::FILE_SIZE)
    }

    pub fn start_offset(&self) -> u32 {
        read_u32(&self.header, field::START_OFFSET)
    }

    pub fn info_header_size(&self) -> u32 {
        read_u32(&self.header, field::INFO_HEADER_SIZE)
    }

    pub fn width(&self) -> usize {
        usize::try_from(read_i32(&self.header, field::WIDTH)).unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        usize::try_from(read_i32(&self.header, field::HEIGHT)).unwrap_or(0)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    pub fn color_planes(&self) -> u16 {
        read_u16(&self.header, field::COLOR_PLANES)
    }

    pub fn color_depth(&self) -> u16 {
        read_u16(&self.header, field::COLOR_DEPTH)
    }

    pub fn compression(&self) -> u32 {
        read_u32(&self.header, field::COMPRESSION)
    }

    /// Bytes per row including padding.
    pub fn stride(&self) -> usize {
        stride_for(self.width(), self.color_depth())
    }

    /// Buffer offset of the blue byte of pixel `(x, y)`, `y = 0` being the top row.
    pub fn offset(&self, x: usize, y: usize) -> Result<usize> {
        let (width, height) = self.dimensions();
        if x >= width || y >= height {
            return Err(BitmapError::OutOfRange {
                x,
                y,
                width,
                height,
            });
        }
        Ok(x * BYTES_PER_PIXEL + (height - y - 1) * self.stride())
    }

    pub fn pixel(&self, x: usize, y: usize) -> Result<Pixel> {
        let pos = self.offset(x, y)?;
        Ok(Pixel::from_bgr([
            self.pixels[pos],
            self.pixels[pos + 1],
            self.pixels[pos + 2],
        ]))
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: Pixel) -> Result<()> {
        let pos = self.offset(x, y)?;
        self.pixels[pos..pos + BYTES_PER_PIXEL].copy_from_slice(&pixel.to_bgr());
        Ok(())
    }

    /// Paint every pixel with `pixel`. Row padding stays zero.
    pub fn fill(&mut self, pixel: Pixel) {
        let (width, height) = self.dimensions();
        let stride = self.stride();
        let bgr = pixel.to_bgr();
        for row in 0..height {
            let start = row * stride;
            for chunk in self.pixels[start..start + width * BYTES_PER_PIXEL]
                .chunks_exact_mut(BYTES_PER_PIXEL)
            {
                chunk.copy_from_slice(&bgr);
            }
        }
    }

    /// Build a same-sized image by applying `f` to every pixel.
    pub fn map_pixels(&self, mut f: impl FnMut(Pixel) -> Pixel) -> Result<Self> {
        let mut out = Self::create(self.width(), self.height())?;
        for y in 0..self.height() {
            for x in 0..self.width() {
                out.set_pixel(x, y, f(self.pixel(x, y)?))?;
            }
        }
        Ok(out)
    }

    /// Pixels in row-major order, top row first.
    pub fn to_pixel_vec(&self) -> Result<Vec<Pixel>> {
        let (width, height) = self.dimensions();
        let mut out = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                out.push(self.pixel(x, y)?);
            }
        }
        Ok(out)
    }
}
