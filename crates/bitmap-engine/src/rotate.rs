//! Rotation by an arbitrary angle using nearest-neighbor inverse mapping.

use tracing::debug;

use crate::bitmap::Image;
use crate::error::{BitmapError, Result};

/// Rotate `image` by `degrees`.
///
/// The output is the bounding box of the rotated source. Each destination
/// pixel is mapped back into source space around the image centers; if it
/// lands inside the source, the nearest source pixel is copied, otherwise the
/// destination stays black.
pub fn rotate(image: &Image, degrees: f64) -> Result<Image> {
    if !degrees.is_finite() {
        return Err(BitmapError::InvalidArgument(format!(
            "rotation angle must be finite, got {degrees}"
        )));
    }
    let (width, height) = image.dimensions();
    let (sin, cos) = sin_cos_degrees(degrees);

    let (w, h) = (width as f64, height as f64);
    let new_width = ((w * cos.abs() + h * sin.abs()).floor() as usize).max(1);
    let new_height = ((w * sin.abs() + h * cos.abs()).floor() as usize).max(1);

    debug!(
        width,
        height,
        degrees,
        new_width,
        new_height,
        "Rotating image"
    );

    let src_cx = (w - 1.0) / 2.0;
    let src_cy = (h - 1.0) / 2.0;
    let dst_cx = (new_width as f64 - 1.0) / 2.0;
    let dst_cy = (new_height as f64 - 1.0) / 2.0;

    let mut output = Image::create(new_width, new_height)?;
    for y in 0..new_height {
        let dy = y as f64 - dst_cy;
        for x in 0..new_width {
            let dx = x as f64 - dst_cx;
            let sx = (dx * cos - dy * sin + src_cx).round();
            let sy = (dx * sin + dy * cos + src_cy).round();

            if sx >= 0.0 && sx < w && sy >= 0.0 && sy < h {
                output.set_pixel(x, y, image.pixel(sx as usize, sy as usize)?)?;
            }
        }
    }
    Ok(output)
}

/// Sine and cosine of an angle in degrees, exact for multiples of 90.
fn sin_cos_degrees(degrees: f64) -> (f64, f64) {
    let normalized = degrees.rem_euclid(360.0);
    if normalized == 0.0 {
        (0.0, 1.0)
    } else if normalized == 90.0 {
        (1.0, 0.0)
    } else if normalized == 180.0 {
        (0.0, -1.0)
    } else if normalized == 270.0 {
        (-1.0, 0.0)
    } else {
        normalized.to_radians().sin_cos()
    }
}
