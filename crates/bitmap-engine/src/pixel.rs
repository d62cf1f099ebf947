//! RGB color value.

use std::fmt;

/// A 24-bit color in logical R, G, B order.
///
/// Bitmap buffers store the channels as B, G, R; the conversion happens in
/// [`crate::Image::pixel`] and [`crate::Image::set_pixel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);
    pub const WHITE: Pixel = Pixel::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Same value on all three channels.
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Integer mean of the three channels.
    pub fn average(self) -> u8 {
        let sum = u16::from(self.red) + u16::from(self.green) + u16::from(self.blue);
        (sum / 3) as u8
    }

    /// Gray pixel whose level is the channel average.
    pub fn grey_average(self) -> Self {
        Self::gray(self.average())
    }

    /// Channel-wise complement.
    pub fn negative(self) -> Self {
        Self::new(255 - self.red, 255 - self.green, 255 - self.blue)
    }

    /// HSV hue in degrees, in `0.0..360.0`. Gray pixels have hue 0.
    pub fn hue(self) -> f32 {
        let r = f32::from(self.red) / 255.0;
        let g = f32::from(self.green) / 255.0;
        let b = f32::from(self.blue) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        if delta == 0.0 {
            return 0.0;
        }

        let hue = if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        hue.rem_euclid(360.0)
    }

    /// Channels in buffer order (B, G, R).
    pub fn to_bgr(self) -> [u8; 3] {
        [self.blue, self.green, self.red]
    }

    pub fn from_bgr(bgr: [u8; 3]) -> Self {
        Self::new(bgr[2], bgr[1], bgr[0])
    }

    /// Apply `f` to each channel.
    pub fn map(self, mut f: impl FnMut(u8) -> u8) -> Self {
        Self::new(f(self.red), f(self.green), f(self.blue))
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.red, self.green, self.blue)
    }
}
