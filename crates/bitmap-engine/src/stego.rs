//! Hiding one image inside another by nibble substitution.
//!
//! Each host channel keeps its high nibble and receives the guest channel's
//! high nibble in its low nibble. Revealing shifts the low nibble back up, so
//! the recovered guest has only 4 bits per channel.
//!
//! The guest's dimensions cannot be recovered from the composed image, so
//! they travel in a JSON sidecar next to the bitmap (`name.json` for
//! `name.bmp`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bitmap::Image;
use crate::codec;
use crate::error::{BitmapError, Result};
use crate::pixel::Pixel;
use crate::resize::resize_to;

/// Size of the hidden image, stored in the sidecar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestDimensions {
    pub height: usize,
    pub width: usize,
}

/// A composed image together with the metadata needed to reveal its guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub image: Image,
    pub guest: GuestDimensions,
}

fn hide_byte(host: u8, guest: u8) -> u8 {
    (host & 0xF0) | ((guest >> 4) & 0x0F)
}

fn reveal_byte(composed: u8) -> u8 {
    (composed << 4) & 0xF0
}

/// Hide `guest` in the top-left corner of a copy of `host`.
///
/// A guest larger than the host on either axis is first shrunk by the smaller
/// of the two axis ratios, keeping at least one pixel on each axis.
pub fn encrypt(host: &Image, guest: &Image) -> Result<Encoded> {
    let (host_w, host_h) = host.dimensions();
    let (guest_w, guest_h) = guest.dimensions();

    let scaled;
    let guest = if guest_w > host_w || guest_h > host_h {
        let scale = (host_w as f64 / guest_w as f64).min(host_h as f64 / guest_h as f64);
        // A lopsided guest may floor an axis to zero; keep at least one pixel.
        let target_w = ((guest_w as f64 * scale).floor() as usize).clamp(1, host_w);
        let target_h = ((guest_h as f64 * scale).floor() as usize).clamp(1, host_h);
        debug!(
            guest_w,
            guest_h,
            host_w,
            host_h,
            scale,
            target_w,
            target_h,
            "Shrinking guest to fit host"
        );
        scaled = resize_to(guest, target_w, target_h)?;
        &scaled
    } else {
        guest
    };

    let (width, height) = guest.dimensions();
    let mut composed = host.duplicate();
    for y in 0..height {
        for x in 0..width {
            let h = host.pixel(x, y)?;
            let g = guest.pixel(x, y)?;
            composed.set_pixel(
                x,
                y,
                Pixel::new(
                    hide_byte(h.red, g.red),
                    hide_byte(h.green, g.green),
                    hide_byte(h.blue, g.blue),
                ),
            )?;
        }
    }

    info!(width, height, "Hid guest image");
    Ok(Encoded {
        image: composed,
        guest: GuestDimensions { height, width },
    })
}

/// Extract a guest of size `guest` from `composed`.
pub fn reveal(composed: &Image, guest: GuestDimensions) -> Result<Image> {
    let (width, height) = composed.dimensions();
    if guest.width > width || guest.height > height {
        return Err(BitmapError::InvalidArgument(format!(
            "hidden image {}x{} does not fit in the {width}x{height} carrier",
            guest.width, guest.height
        )));
    }

    let mut revealed = Image::create(guest.width, guest.height)?;
    for y in 0..guest.height {
        for x in 0..guest.width {
            let p = composed.pixel(x, y)?;
            revealed.set_pixel(x, y, p.map(reveal_byte))?;
        }
    }
    Ok(revealed)
}

/// Path of the sidecar belonging to `image_path`.
pub fn sidecar_path(image_path: impl AsRef<Path>) -> PathBuf {
    image_path.as_ref().with_extension("json")
}

/// Write the composed bitmap to `path` and its sidecar next to it.
pub fn save_encoded(encoded: &Encoded, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    codec::save(&encoded.image, path)?;
    let sidecar = sidecar_path(path);
    fs::write(&sidecar, serde_json::to_string(&encoded.guest)?)?;
    debug!(sidecar = %sidecar.display(), "Wrote guest dimensions");
    Ok(())
}

/// Load a composed bitmap and its sidecar, and reveal the hidden image.
pub fn decrypt(path: impl AsRef<Path>) -> Result<Image> {
    let path = path.as_ref();
    let composed = codec::load(path)?;
    let sidecar = fs::read_to_string(sidecar_path(path))?;
    let guest: GuestDimensions = serde_json::from_str(&sidecar)?;
    info!(width = guest.width, height = guest.height, "Revealing hidden image");
    reveal(&composed, guest)
}
