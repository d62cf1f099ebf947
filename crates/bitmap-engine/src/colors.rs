//! Per-pixel color remapping: grayscale, black-and-white, negative and
//! Floyd-Steinberg dithering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bitmap::Image;
use crate::error::{BitmapError, Result};
use crate::pixel::Pixel;

/// Gray level at or above which a pixel becomes white.
const THRESHOLD: u8 = 128;

/// Available color remappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Shades of gray (channel average).
    Grayscale,
    /// Pure black or white depending on the gray level.
    BlackAndWhite,
    /// Complement of every channel.
    Negative,
    /// Black and white with error diffusion.
    Dithered,
}

impl ColorMode {
    pub const ALL: [ColorMode; 4] = [
        ColorMode::Grayscale,
        ColorMode::BlackAndWhite,
        ColorMode::Negative,
        ColorMode::Dithered,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorMode::Grayscale => "grayscale",
            ColorMode::BlackAndWhite => "black_and_white",
            ColorMode::Negative => "negative",
            ColorMode::Dithered => "dithered",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMode {
    type Err = BitmapError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|m| m.name() == normalized)
            .ok_or_else(|| BitmapError::InvalidArgument(format!("unknown color mode: {s}")))
    }
}

/// Return a recolored copy of `image`.
pub fn alter_colors(image: &Image, mode: ColorMode) -> Result<Image> {
    let (width, height) = image.dimensions();
    debug!(width, height, ?mode, "Altering colors");

    match mode {
        ColorMode::Grayscale => image.map_pixels(Pixel::grey_average),
        ColorMode::BlackAndWhite => image.map_pixels(|p| threshold(p, THRESHOLD)),
        ColorMode::Negative => image.map_pixels(Pixel::negative),
        ColorMode::Dithered => floyd_steinberg_dither(image),
    }
}

/// White when the pixel's gray level is at least `level`, black otherwise.
pub fn threshold(pixel: Pixel, level: u8) -> Pixel {
    if pixel.average() >= level {
        Pixel::WHITE
    } else {
        Pixel::BLACK
    }
}

/// Convert to black-and-white using Floyd-Steinberg error diffusion.
///
/// Error distribution pattern:
/// - Right:        7/16
/// - Bottom-left:  3/16
/// - Bottom:       5/16
/// - Bottom-right: 1/16
pub fn floyd_steinberg_dither(image: &Image) -> Result<Image> {
    let (width, height) = image.dimensions();

    // i16 holds the diffused error without overflow
    let mut buffer = Vec::with_capacity(height);
    for y in 0..height {
        let mut row = Vec::with_capacity(width);
        for x in 0..width {
            row.push(i16::from(image.pixel(x, y)?.average()));
        }
        buffer.push(row);
    }

    let mut output = Image::create(width, height)?;
    for y in 0..height {
        for x in 0..width {
            let old = buffer[y][x];
            let new: i16 = if old >= i16::from(THRESHOLD) { 255 } else { 0 };
            distribute_error(&mut buffer, x, y, old - new);
            output.set_pixel(x, y, Pixel::gray(new as u8))?;
        }
    }

    debug!("Floyd-Steinberg dithering complete");
    Ok(output)
}

fn distribute_error(buffer: &mut [Vec<i16>], x: usize, y: usize, error: i16) {
    let height = buffer.len();
    let width = buffer[y].len();

    if x + 1 < width {
        buffer[y][x + 1] += error * 7 / 16;
    }
    if y + 1 < height {
        if x > 0 {
            buffer[y + 1][x - 1] += error * 3 / 16;
        }
        buffer[y + 1][x] += error * 5 / 16;
        if x + 1 < width {
            buffer[y + 1][x + 1] += error / 16;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(width: usize, height: usize) -> Image {
        let mut img = Image::create(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                let val = ((x + y) * 255 / (width + height - 2)) as u8;
                img.set_pixel(x, y, Pixel::new(val, val / 2, 255 - val)).unwrap();
            }
        }
        img
    }

    #[test]
    fn test_parse_modes() {
        for mode in ColorMode::ALL {
            assert_eq!(mode.name().parse::<ColorMode>().unwrap(), mode);
        }
        assert_eq!("Black-And-White".parse::<ColorMode>().unwrap(), ColorMode::BlackAndWhite);
        assert!("sepia".parse::<ColorMode>().is_err());
    }

    fn assert_binary(img: &Image) {
        for y in 0..img.height() {
            for x in 0..img.width() {
                let p = img.pixel(x, y).unwrap();
                assert!(
                    p == Pixel::WHITE || p == Pixel::BLACK,
                    "Pixel ({x}, {y}) = {p}, expected black or white"
                );
            }
        }
    }

    #[test]
    fn test_grayscale_white_stays_white() {
        let mut img = Image::create(20, 20).unwrap();
        img.fill(Pixel::WHITE);
        let result = alter_colors(&img, ColorMode::Grayscale).unwrap();
        assert_eq!(result.pixel(0, 0).unwrap(), Pixel::WHITE);
        assert_eq!(result, img);
    }

    #[test]
    fn test_grayscale_averages_channels() {
        let mut img = Image::create(1, 1).unwrap();
        img.set_pixel(0, 0, Pixel::new(30, 60, 90)).unwrap();
        let result = alter_colors(&img, ColorMode::Grayscale).unwrap();
        assert_eq!(result.pixel(0, 0).unwrap(), Pixel::gray(60));
    }

    #[test]
    fn test_black_and_white_threshold() {
        let mut img = Image::create(4, 1).unwrap();
        img.set_pixel(0, 0, Pixel::gray(0)).unwrap();
        img.set_pixel(1, 0, Pixel::gray(127)).unwrap();
        img.set_pixel(2, 0, Pixel::gray(128)).unwrap();
        img.set_pixel(3, 0, Pixel::new(255, 255, 0)).unwrap(); // average 170

        let result = alter_colors(&img, ColorMode::BlackAndWhite).unwrap();
        assert_eq!(result.pixel(0, 0).unwrap(), Pixel::BLACK);
        assert_eq!(result.pixel(1, 0).unwrap(), Pixel::BLACK);
        assert_eq!(result.pixel(2, 0).unwrap(), Pixel::WHITE);
        assert_eq!(result.pixel(3, 0).unwrap(), Pixel::WHITE);
    }

    #[test]
    fn test_negative_is_involution() {
        let img = gradient_image(5, 4);
        let twice = alter_colors(&alter_colors(&img, ColorMode::Negative).unwrap(), ColorMode::Negative)
            .unwrap();
        assert_eq!(twice, img);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let img = gradient_image(3, 3);
        let before = img.clone();
        let _ = alter_colors(&img, ColorMode::Negative).unwrap();
        assert_eq!(img, before);
    }

    #[test]
    fn test_dither_output_is_binary() {
        let img = gradient_image(8, 8);
        let result = alter_colors(&img, ColorMode::Dithered).unwrap();
        assert_eq!(result.dimensions(), (8, 8));
        assert_binary(&result);
    }

    #[test]
    fn test_dither_uniform_inputs() {
        let mut white = Image::create(4, 4).unwrap();
        white.fill(Pixel::WHITE);
        assert_eq!(floyd_steinberg_dither(&white).unwrap(), white);

        let black = Image::create(4, 4).unwrap();
        assert_eq!(floyd_steinberg_dither(&black).unwrap(), black);
    }
}
