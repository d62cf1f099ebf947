//! Convolution filtering with configurable kernel origin and edge handling.
//!
//! Each output channel is the sum of `weight * source` over the kernel window,
//! accumulated in `f64`, rounded to nearest and saturated to `0..=255`.

mod kernels;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bitmap::Image;
use crate::error::{BitmapError, Result};
use crate::pixel::Pixel;

pub use kernels::NamedKernel;

/// Kernel cell aligned with the output pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelOrigin {
    /// Middle cell. Only honored when both kernel dimensions are odd.
    #[default]
    Center,
    /// Cell (0, 0).
    TopLeft,
}

impl KernelOrigin {
    /// Origin actually used for a `rows` x `cols` kernel.
    pub fn effective(self, rows: usize, cols: usize) -> Self {
        match self {
            KernelOrigin::Center if rows % 2 == 1 && cols % 2 == 1 => KernelOrigin::Center,
            _ => KernelOrigin::TopLeft,
        }
    }
}

/// How taps that fall outside the image are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeProcessing {
    /// Clamp to the nearest edge pixel.
    Extend,
    /// Index modulo the image dimension.
    Wrap,
    /// Reflect across the border (`-1 -> 0`, `n -> n - 1`).
    Mirror,
    /// Shrink the output so no tap leaves the image.
    Crop,
    /// Ignore out-of-bounds taps. Retained weights are not renormalized.
    #[default]
    KernelCrop,
}

impl EdgeProcessing {
    pub const ALL: [EdgeProcessing; 5] = [
        EdgeProcessing::Extend,
        EdgeProcessing::Wrap,
        EdgeProcessing::Mirror,
        EdgeProcessing::Crop,
        EdgeProcessing::KernelCrop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EdgeProcessing::Extend => "extend",
            EdgeProcessing::Wrap => "wrap",
            EdgeProcessing::Mirror => "mirror",
            EdgeProcessing::Crop => "crop",
            EdgeProcessing::KernelCrop => "kernel_crop",
        }
    }

    /// Map `coord` onto `0..len`, or `None` when the tap is dropped.
    fn resolve(self, coord: isize, len: usize) -> Option<usize> {
        let n = len as isize;
        if (0..n).contains(&coord) {
            return Some(coord as usize);
        }
        match self {
            EdgeProcessing::Extend => Some(coord.clamp(0, n - 1) as usize),
            EdgeProcessing::Wrap => Some(coord.rem_euclid(n) as usize),
            EdgeProcessing::Mirror => {
                let period = 2 * n;
                let m = coord.rem_euclid(period);
                let reflected = if m >= n { period - 1 - m } else { m };
                Some(reflected as usize)
            }
            EdgeProcessing::Crop | EdgeProcessing::KernelCrop => None,
        }
    }
}

impl fmt::Display for EdgeProcessing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgeProcessing {
    type Err = BitmapError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|e| e.name() == normalized)
            .ok_or_else(|| BitmapError::InvalidArgument(format!("unknown edge policy: {s}")))
    }
}

impl FromStr for KernelOrigin {
    type Err = BitmapError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "center" => Ok(KernelOrigin::Center),
            "top_left" => Ok(KernelOrigin::TopLeft),
            _ => Err(BitmapError::InvalidArgument(format!(
                "unknown kernel origin: {s}"
            ))),
        }
    }
}

/// A rectangular matrix of weights with its origin and edge policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Vec<f32>,
    rows: usize,
    cols: usize,
    origin: KernelOrigin,
    edge: EdgeProcessing,
}

impl Kernel {
    /// Build a kernel from row vectors.
    ///
    /// Fails with `InvalidArgument` when there are no rows or columns, rows
    /// differ in length, or a weight is not finite.
    pub fn new(rows: Vec<Vec<f32>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || cols == 0 {
            return Err(BitmapError::InvalidArgument("kernel is empty".into()));
        }
        if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
            return Err(BitmapError::InvalidArgument(format!(
                "kernel row {bad} has {} weights, expected {cols}",
                rows[bad].len()
            )));
        }
        if rows.iter().flatten().any(|w| !w.is_finite()) {
            return Err(BitmapError::InvalidArgument(
                "kernel weights must be finite".into(),
            ));
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            weights: rows.into_iter().flatten().collect(),
            origin: KernelOrigin::default(),
            edge: EdgeProcessing::default(),
        })
    }

    /// Build a kernel from a fixed-size matrix.
    pub fn from_matrix<const R: usize, const C: usize>(matrix: [[f32; C]; R]) -> Self {
        debug_assert!(R > 0 && C > 0);
        Self {
            weights: matrix.iter().flatten().copied().collect(),
            rows: R,
            cols: C,
            origin: KernelOrigin::default(),
            edge: EdgeProcessing::default(),
        }
    }

    /// `size` x `size` mean filter.
    pub fn box_blur(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(BitmapError::InvalidArgument(
                "box blur size must be at least 1".into(),
            ));
        }
        let weight = 1.0 / (size * size) as f32;
        Self::new(vec![vec![weight; size]; size])
    }

    /// Builder: set the origin.
    pub fn with_origin(mut self, origin: KernelOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Builder: set the edge policy.
    pub fn with_edge(mut self, edge: EdgeProcessing) -> Self {
        self.edge = edge;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn origin(&self) -> KernelOrigin {
        self.origin
    }

    pub fn edge(&self) -> EdgeProcessing {
        self.edge
    }

    pub fn weight(&self, dy: usize, dx: usize) -> f32 {
        self.weights[dy * self.cols + dx]
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

/// Convolve with the kernel's own origin and edge policy.
pub fn apply_kernel(image: &Image, kernel: &Kernel) -> Result<Image> {
    apply(image, kernel, kernel.origin(), kernel.edge())
}

/// Convolve with one of the built-in kernels.
pub fn apply_named(
    image: &Image,
    named: NamedKernel,
    origin: KernelOrigin,
    edge: EdgeProcessing,
) -> Result<Image> {
    apply(image, &named.kernel(), origin, edge)
}

/// Convolve `image` with `kernel`.
///
/// The output has the input's size, except under [`EdgeProcessing::Crop`]
/// where it loses `kernel.rows() - 1` rows and `kernel.cols() - 1` columns.
pub fn apply(
    image: &Image,
    kernel: &Kernel,
    origin: KernelOrigin,
    edge: EdgeProcessing,
) -> Result<Image> {
    let (width, height) = image.dimensions();
    let (rows, cols) = (kernel.rows(), kernel.cols());
    let origin = origin.effective(rows, cols);
    let (anchor_y, anchor_x) = match origin {
        KernelOrigin::Center => (rows / 2, cols / 2),
        KernelOrigin::TopLeft => (0, 0),
    };

    let (out_width, out_height) = if edge == EdgeProcessing::Crop {
        let w = width as isize - (cols as isize - 1);
        let h = height as isize - (rows as isize - 1);
        if w <= 0 || h <= 0 {
            return Err(BitmapError::Arithmetic(format!(
                "cropping a {width}x{height} image with a {cols}x{rows} kernel leaves {w}x{h}"
            )));
        }
        (w as usize, h as usize)
    } else {
        (width, height)
    };

    debug!(
        width,
        height,
        rows,
        cols,
        ?origin,
        %edge,
        out_width,
        out_height,
        "Applying convolution kernel"
    );

    let source = image.to_pixel_vec()?;
    let mut output = Image::create(out_width, out_height)?;

    for y in 0..out_height {
        for x in 0..out_width {
            let mut acc = [0f64; 3];

            for dy in 0..rows {
                for dx in 0..cols {
                    let tap = if edge == EdgeProcessing::Crop {
                        Some((y + dy, x + dx))
                    } else {
                        let sy = (y + dy) as isize - anchor_y as isize;
                        let sx = (x + dx) as isize - anchor_x as isize;
                        edge.resolve(sy, height).zip(edge.resolve(sx, width))
                    };
                    let Some((sy, sx)) = tap else {
                        continue;
                    };

                    let w = f64::from(kernel.weight(dy, dx));
                    let p = source[sy * width + sx];
                    acc[0] += w * f64::from(p.red);
                    acc[1] += w * f64::from(p.green);
                    acc[2] += w * f64::from(p.blue);
                }
            }

            output.set_pixel(
                x,
                y,
                Pixel::new(saturate(acc[0]), saturate(acc[1]), saturate(acc[2])),
            )?;
        }
    }

    Ok(output)
}

fn saturate(sum: f64) -> u8 {
    sum.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, pixel: Pixel) -> Image {
        let mut img = Image::create(width, height).unwrap();
        img.fill(pixel);
        img
    }

    /// 3x3 image whose red channel encodes the position: 10 * (y * 3 + x + 1).
    fn numbered() -> Image {
        let mut img = Image::create(3, 3).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                let v = (10 * (y * 3 + x + 1)) as u8;
                img.set_pixel(x, y, Pixel::new(v, 0, 0)).unwrap();
            }
        }
        img
    }

    fn red(img: &Image, x: usize, y: usize) -> u8 {
        img.pixel(x, y).unwrap().red
    }

    #[test]
    fn test_gaussian_on_white_is_identity() {
        let img = solid(4, 4, Pixel::WHITE);
        let result = apply(
            &img,
            &NamedKernel::GaussianBlur3x3.kernel(),
            KernelOrigin::Center,
            EdgeProcessing::Extend,
        )
        .unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_identity_kernel() {
        let img = numbered();
        let identity = Kernel::from_matrix([[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]);
        for edge in EdgeProcessing::ALL {
            if edge == EdgeProcessing::Crop {
                continue;
            }
            let result = apply(&img, &identity, KernelOrigin::Center, edge).unwrap();
            assert_eq!(result, img, "identity failed under {edge}");
        }
    }

    #[test]
    fn test_output_is_saturated() {
        let img = numbered();
        let bright = Kernel::from_matrix([[10.0]]);
        let result = apply_kernel(&img, &bright).unwrap();
        assert_eq!(red(&result, 2, 2), 255);

        let dark = Kernel::from_matrix([[-1.0]]);
        let result = apply_kernel(&img, &dark).unwrap();
        assert_eq!(red(&result, 0, 0), 0);
    }

    #[test]
    fn test_kernel_crop_does_not_renormalize() {
        let img = solid(3, 3, Pixel::gray(90));
        let result = apply(
            &img,
            &NamedKernel::BoxBlur.kernel(),
            KernelOrigin::Center,
            EdgeProcessing::KernelCrop,
        )
        .unwrap();
        // Corner keeps 4 of 9 taps, edge 6 of 9, center all 9.
        assert_eq!(red(&result, 0, 0), 40);
        assert_eq!(red(&result, 1, 0), 60);
        assert_eq!(red(&result, 1, 1), 90);
    }

    #[test]
    fn test_edge_policies_on_left_tap() {
        // Kernel samples only the pixel to the left of the output.
        let left = Kernel::from_matrix([[1.0, 0.0, 0.0]]);
        let img = numbered();

        let extend = apply(&img, &left, KernelOrigin::Center, EdgeProcessing::Extend).unwrap();
        assert_eq!(red(&extend, 0, 0), 10);
        assert_eq!(red(&extend, 1, 0), 10);

        let wrap = apply(&img, &left, KernelOrigin::Center, EdgeProcessing::Wrap).unwrap();
        assert_eq!(red(&wrap, 0, 0), 30);

        let mirror = apply(&img, &left, KernelOrigin::Center, EdgeProcessing::Mirror).unwrap();
        assert_eq!(red(&mirror, 0, 1), 40);

        let skip = apply(&img, &left, KernelOrigin::Center, EdgeProcessing::KernelCrop).unwrap();
        assert_eq!(red(&skip, 0, 2), 0);
        assert_eq!(red(&skip, 2, 2), 80);
    }

    #[test]
    fn test_mirror_wide_kernel_stays_in_bounds() {
        let img = numbered();
        let wide = Kernel::new(vec![vec![1.0 / 9.0; 9]]).unwrap();
        let result = apply(&img, &wide, KernelOrigin::Center, EdgeProcessing::Mirror).unwrap();
        assert_eq!(result.dimensions(), (3, 3));

        // Row 0 is 10 20 30. Reflecting with period 6, taps -4..=4 around x = 0
        // read 30 30 20 10 | 10 20 30 | 30 20: 200 / 9 = 22.2.
        assert_eq!(red(&result, 0, 0), 22);
        // Taps -3..=5: 30 20 10 | 10 20 30 | 30 20 10 = 180 / 9.
        assert_eq!(red(&result, 1, 0), 20);
        // Taps -2..=6: 20 10 | 10 20 30 | 30 20 10 10 = 160 / 9 = 17.8.
        assert_eq!(red(&result, 2, 0), 18);
    }

    #[test]
    fn test_crop_shrinks_output() {
        let img = solid(5, 4, Pixel::gray(100));
        let kernel = NamedKernel::BoxBlur.kernel();
        let result = apply(&img, &kernel, KernelOrigin::Center, EdgeProcessing::Crop).unwrap();
        assert_eq!(result.dimensions(), (3, 2));
        assert_eq!(result.pixel(0, 0).unwrap(), Pixel::gray(100));
    }

    #[test]
    fn test_crop_to_nothing_is_arithmetic_error() {
        let img = solid(2, 2, Pixel::WHITE);
        let kernel = NamedKernel::Sharpen.kernel();
        assert!(matches!(
            apply(&img, &kernel, KernelOrigin::Center, EdgeProcessing::Crop),
            Err(BitmapError::Arithmetic(_))
        ));
    }

    #[test]
    fn test_even_kernel_falls_back_to_top_left() {
        assert_eq!(KernelOrigin::Center.effective(2, 2), KernelOrigin::TopLeft);
        assert_eq!(KernelOrigin::Center.effective(3, 2), KernelOrigin::TopLeft);
        assert_eq!(KernelOrigin::Center.effective(3, 3), KernelOrigin::Center);

        // [[1, 0], [0, 0]] anchored top-left copies the pixel itself.
        let img = numbered();
        let kernel = Kernel::from_matrix([[1.0, 0.0], [0.0, 0.0]]);
        let result = apply(&img, &kernel, KernelOrigin::Center, EdgeProcessing::KernelCrop).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_top_left_origin_shifts_window() {
        let img = numbered();
        let kernel = Kernel::from_matrix([[0.0, 0.0], [0.0, 1.0]]);
        let result = apply(&img, &kernel, KernelOrigin::TopLeft, EdgeProcessing::KernelCrop).unwrap();
        // Output (0, 0) reads source (1, 1).
        assert_eq!(red(&result, 0, 0), 50);
        assert_eq!(red(&result, 2, 2), 0);
    }

    #[test]
    fn test_invalid_kernels() {
        assert!(matches!(Kernel::new(vec![]), Err(BitmapError::InvalidArgument(_))));
        assert!(matches!(
            Kernel::new(vec![vec![]]),
            Err(BitmapError::InvalidArgument(_))
        ));
        assert!(matches!(
            Kernel::new(vec![vec![1.0, 2.0], vec![1.0]]),
            Err(BitmapError::InvalidArgument(_))
        ));
        assert!(Kernel::new(vec![vec![f32::NAN]]).is_err());
        assert!(Kernel::box_blur(0).is_err());
    }

    #[test]
    fn test_builder_carries_policies() {
        let kernel = NamedKernel::Sharpen
            .kernel()
            .with_origin(KernelOrigin::TopLeft)
            .with_edge(EdgeProcessing::Wrap);
        assert_eq!(kernel.origin(), KernelOrigin::TopLeft);
        assert_eq!(kernel.edge(), EdgeProcessing::Wrap);
    }

    #[test]
    fn test_parse_policies() {
        assert_eq!("kernel-crop".parse::<EdgeProcessing>().unwrap(), EdgeProcessing::KernelCrop);
        assert_eq!("Mirror".parse::<EdgeProcessing>().unwrap(), EdgeProcessing::Mirror);
        assert_eq!("top_left".parse::<KernelOrigin>().unwrap(), KernelOrigin::TopLeft);
        assert!("diagonal".parse::<EdgeProcessing>().is_err());
    }
}
