//! Conversion to and from the `image` crate for export and import of other
//! formats. The engine itself never goes through this module.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ::image::codecs::jpeg::JpegEncoder;
use ::image::{ImageFormat, Rgb, RgbImage};
use tracing::info;

use crate::bitmap::Image;
use crate::error::{BitmapError, Result};
use crate::pixel::Pixel;

fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| BitmapError::InvalidArgument(format!("dimension {value} does not fit in u32")))
}

/// Copy the pixels of `image` into an [`RgbImage`].
pub fn to_rgb_image(image: &Image) -> Result<RgbImage> {
    let mut out = RgbImage::new(to_u32(image.width())?, to_u32(image.height())?);
    for (x, y, rgb) in out.enumerate_pixels_mut() {
        let p = image.pixel(x as usize, y as usize)?;
        *rgb = Rgb([p.red, p.green, p.blue]);
    }
    Ok(out)
}

/// Build a 24-bit bitmap from an [`RgbImage`].
pub fn from_rgb_image(rgb: &RgbImage) -> Result<Image> {
    let mut image = Image::create(rgb.width() as usize, rgb.height() as usize)?;
    for (x, y, &Rgb([red, green, blue])) in rgb.enumerate_pixels() {
        image.set_pixel(x as usize, y as usize, Pixel::new(red, green, blue))?;
    }
    Ok(image)
}

/// Decode any format the `image` crate understands into a bitmap.
pub fn import(path: impl AsRef<Path>) -> Result<Image> {
    let path = path.as_ref();
    let rgb = ::image::open(path)?.to_rgb8();
    info!(path = %path.display(), width = rgb.width(), height = rgb.height(), "Imported image");
    from_rgb_image(&rgb)
}

/// Write `image` in the format implied by the extension of `path`.
pub fn export(image: &Image, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)?;
    to_rgb_image(image)?.save_with_format(path, format)?;
    info!(path = %path.display(), ?format, "Exported image");
    Ok(())
}

/// Write `image` as a JPEG with the given quality (1-100).
pub fn export_jpeg(image: &Image, path: impl AsRef<Path>, quality: u8) -> Result<()> {
    if !(1..=100).contains(&quality) {
        return Err(BitmapError::InvalidArgument(format!(
            "JPEG quality must be between 1 and 100, got {quality}"
        )));
    }
    let path = path.as_ref();
    let rgb = to_rgb_image(image)?;
    let mut writer = BufWriter::new(File::create(path)?);
    JpegEncoder::new_with_quality(&mut writer, quality).encode_image(&rgb)?;
    writer.flush()?;
    info!(path = %path.display(), quality, "Exported JPEG");
    Ok(())
}
