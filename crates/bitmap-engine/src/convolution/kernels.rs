//! Built-in kernels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Kernel;
use crate::error::BitmapError;

/// Kernels with fixed, well-known coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedKernel {
    /// Laplacian edge detector.
    EdgeDetection,
    Sharpen,
    /// 3x3 binomial approximation of a Gaussian.
    #[serde(rename = "gaussian_blur_3x3")]
    GaussianBlur3x3,
    /// 3x3 mean filter.
    BoxBlur,
    /// Same coefficients as [`NamedKernel::Sharpen`].
    Contrast,
    /// Diagonal emboss.
    EdgePushing,
}

const EDGE_DETECTION: [[f32; 3]; 3] = [
    [0.0, 1.0, 0.0],
    [1.0, -4.0, 1.0],
    [0.0, 1.0, 0.0],
];

const SHARPEN: [[f32; 3]; 3] = [
    [0.0, -1.0, 0.0],
    [-1.0, 5.0, -1.0],
    [0.0, -1.0, 0.0],
];

const GAUSSIAN_BLUR_3X3: [[f32; 3]; 3] = [
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
    [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
];

const BOX_BLUR: [[f32; 3]; 3] = [[1.0 / 9.0; 3]; 3];

const EDGE_PUSHING: [[f32; 3]; 3] = [
    [-2.0, -1.0, 0.0],
    [-1.0, 1.0, 1.0],
    [0.0, 1.0, 2.0],
];

impl NamedKernel {
    pub const ALL: [NamedKernel; 6] = [
        NamedKernel::EdgeDetection,
        NamedKernel::Sharpen,
        NamedKernel::GaussianBlur3x3,
        NamedKernel::BoxBlur,
        NamedKernel::Contrast,
        NamedKernel::EdgePushing,
    ];

    /// The constant matrix for this kernel, with default origin and edge policy.
    pub fn kernel(self) -> Kernel {
        let matrix = match self {
            NamedKernel::EdgeDetection => EDGE_DETECTION,
            NamedKernel::Sharpen | NamedKernel::Contrast => SHARPEN,
            NamedKernel::GaussianBlur3x3 => GAUSSIAN_BLUR_3X3,
            NamedKernel::BoxBlur => BOX_BLUR,
            NamedKernel::EdgePushing => EDGE_PUSHING,
        };
        Kernel::from_matrix(matrix)
    }

    pub fn name(self) -> &'static str {
        match self {
            NamedKernel::EdgeDetection => "edge_detection",
            NamedKernel::Sharpen => "sharpen",
            NamedKernel::GaussianBlur3x3 => "gaussian_blur_3x3",
            NamedKernel::BoxBlur => "box_blur",
            NamedKernel::Contrast => "contrast",
            NamedKernel::EdgePushing => "edge_pushing",
        }
    }
}

impl fmt::Display for NamedKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NamedKernel {
    type Err = BitmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|k| k.name() == normalized)
            .ok_or_else(|| BitmapError::InvalidArgument(format!("unknown kernel: {s}")))
    }
}
