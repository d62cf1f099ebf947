//! Nearest-neighbor scaling by a uniform factor.

use tracing::debug;

use crate::bitmap::Image;
use crate::convolution::{self, EdgeProcessing, Kernel, KernelOrigin};
use crate::error::{BitmapError, Result};

/// Largest accepted scale factor.
pub const MAX_SCALE: f32 = 20.0;

/// Scale `image` by `scale` using nearest-neighbor sampling.
///
/// Destination pixel `(x, y)` copies source pixel
/// `(floor(x / scale), floor(y / scale))`. A scale of exactly 1 returns a
/// duplicate.
pub fn resize(image: &Image, scale: f32) -> Result<Image> {
    let (new_width, new_height) = target_dimensions(image, scale)?;
    if scale == 1.0 {
        debug!("Scale is 1, returning duplicate");
        return Ok(image.duplicate());
    }

    let (width, height) = image.dimensions();
    debug!(
        width,
        height,
        scale,
        new_width,
        new_height,
        "Resizing image"
    );

    let scale = f64::from(scale);
    sample_nearest(
        image,
        new_width,
        new_height,
        |x| ((x as f64 / scale) as usize).min(width - 1),
        |y| ((y as f64 / scale) as usize).min(height - 1),
    )
}

/// Nearest-neighbor resample to exactly `new_width` x `new_height`.
///
/// Destination pixel `(x, y)` copies source pixel
/// `(floor(x * width / new_width), floor(y * height / new_height))`, so the
/// axes scale independently and no dimension is ever floored away.
pub fn resize_to(image: &Image, new_width: usize, new_height: usize) -> Result<Image> {
    let (width, height) = image.dimensions();
    debug!(width, height, new_width, new_height, "Resampling image");
    sample_nearest(
        image,
        new_width,
        new_height,
        |x| (x * width / new_width).min(width - 1),
        |y| (y * height / new_height).min(height - 1),
    )
}

fn sample_nearest(
    image: &Image,
    new_width: usize,
    new_height: usize,
    source_x: impl Fn(usize) -> usize,
    source_y: impl Fn(usize) -> usize,
) -> Result<Image> {
    let mut output = Image::create(new_width, new_height)?;
    for y in 0..new_height {
        let sy = source_y(y);
        for x in 0..new_width {
            output.set_pixel(x, y, image.pixel(source_x(x), sy)?)?;
        }
    }
    Ok(output)
}

/// Like [`resize`], but when shrinking first blurs the source with a
/// `ceil(1 / scale)` box kernel to reduce aliasing.
pub fn resize_smooth(image: &Image, scale: f32) -> Result<Image> {
    target_dimensions(image, scale)?;
    if scale >= 1.0 {
        return resize(image, scale);
    }

    let size = (1.0 / f64::from(scale)).ceil() as usize;
    debug!(scale, size, "Pre-blurring before downscale");
    let kernel = Kernel::box_blur(size)?;
    let blurred = convolution::apply(image, &kernel, KernelOrigin::Center, EdgeProcessing::Extend)?;
    resize(&blurred, scale)
}

/// Validate `scale` and compute `(floor(width * scale), floor(height * scale))`.
fn target_dimensions(image: &Image, scale: f32) -> Result<(usize, usize)> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(BitmapError::InvalidArgument(format!(
            "scale factor must be positive, got {scale}"
        )));
    }
    if scale > MAX_SCALE {
        return Err(BitmapError::InvalidArgument(format!(
            "scale factor {scale} is too high (maximum {MAX_SCALE})"
        )));
    }

    let (width, height) = image.dimensions();
    let new_width = (width as f64 * f64::from(scale)).floor() as usize;
    let new_height = (height as f64 * f64::from(scale)).floor() as usize;
    if new_width == 0 || new_height == 0 {
        return Err(BitmapError::InvalidArgument(format!(
            "scale factor {scale} is too low for a {width}x{height} image"
        )));
    }
    Ok((new_width, new_height))
}
