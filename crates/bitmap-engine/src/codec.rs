//! Reading and writing the bitmap container.
//!
//! Loading copies the 54 header bytes and then `file_size - start_offset`
//! pixel bytes verbatim; saving writes them back in the same order, so a
//! load/save round trip reproduces the file exactly.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::bitmap::{Image, SIGNATURE, field, stride_for};
use crate::endian::{read_i32, read_u16, read_u32};
use crate::error::{BitmapError, Result};
use crate::{COLOR_DEPTH, HEADER_LEN};

/// Load a bitmap file.
pub fn load(path: impl AsRef<Path>) -> Result<Image> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let image = read_from(BufReader::new(file))?;
    info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Loaded bitmap"
    );
    Ok(image)
}

/// Write `image` to `path`, replacing any existing file.
pub fn save(image: &Image, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_to(image, &mut writer)?;
    writer.flush()?;
    info!(path = %path.display(), bytes = image.file_size(), "Saved bitmap");
    Ok(())
}

/// Decode a bitmap held in memory.
pub fn decode(bytes: &[u8]) -> Result<Image> {
    read_from(bytes)
}

/// Serialize `image` to the exact bytes [`save`] would write.
pub fn encode(image: &Image) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + image.pixels().len());
    out.extend_from_slice(image.header());
    out.extend_from_slice(image.pixels());
    out
}

/// Read one bitmap from `reader`.
pub fn read_from(mut reader: impl Read) -> Result<Image> {
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header)?;

    let data_len = validate_header(&header)?;
    // Grow with the input rather than trusting the declared size up front.
    let mut pixels = Vec::new();
    reader.take(data_len as u64).read_to_end(&mut pixels)?;
    if pixels.len() < data_len {
        return Err(BitmapError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "header declares {data_len} bytes of pixel data, file holds {}",
                pixels.len()
            ),
        )));
    }

    debug!(data_len, "Read pixel data");
    Ok(Image::from_parts(header, pixels))
}

/// Write header then pixel buffer, untouched.
pub fn write_to(image: &Image, mut writer: impl Write) -> Result<()> {
    writer.write_all(image.header())?;
    writer.write_all(image.pixels())?;
    Ok(())
}

/// Check the header describes a layout this crate handles and return the
/// number of pixel bytes that follow it.
fn validate_header(header: &[u8; HEADER_LEN]) -> Result<usize> {
    if header[field::SIGNATURE..field::SIGNATURE + 2] != SIGNATURE {
        return Err(BitmapError::Format(format!(
            "bad signature {:02X} {:02X}, expected \"BM\"",
            header[0], header[1]
        )));
    }

    let depth = read_u16(header, field::COLOR_DEPTH);
    if depth != COLOR_DEPTH {
        return Err(BitmapError::Format(format!(
            "unsupported color depth {depth}, only 24-bit bitmaps are supported"
        )));
    }

    let compression = read_u32(header, field::COMPRESSION);
    if compression != 0 {
        return Err(BitmapError::Format(format!(
            "compressed bitmaps are not supported (compression method {compression})"
        )));
    }

    let width = read_i32(header, field::WIDTH);
    let height = read_i32(header, field::HEIGHT);
    if width <= 0 || height <= 0 {
        return Err(BitmapError::Format(format!(
            "unsupported dimensions {width}x{height}"
        )));
    }

    let start = read_u32(header, field::START_OFFSET);
    if start as usize != HEADER_LEN {
        return Err(BitmapError::Format(format!(
            "pixel data must start at byte {HEADER_LEN}, header says {start}"
        )));
    }

    let file_size = read_u32(header, field::FILE_SIZE);
    let data_len = file_size.checked_sub(start).ok_or_else(|| {
        BitmapError::Format(format!(
            "file size {file_size} is smaller than the pixel offset {start}"
        ))
    })? as usize;

    let required = stride_for(width as usize, depth) * height as usize;
    if data_len < required {
        return Err(BitmapError::Format(format!(
            "pixel data holds {data_len} bytes, {width}x{height} needs {required}"
        )));
    }

    Ok(data_len)
}
