//! Serializable descriptions of engine transformations.
//!
//! A caller (menu, CLI, batch file) builds an [`Operation`] and the engine
//! applies it to an image. Descriptors serialize as JSON tagged by `op`:
//!
//! ```json
//! {"op": "apply_kernel", "kernel": "sharpen", "edge": "mirror"}
//! {"op": "rotate", "degrees": 90.0}
//! ```

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bitmap::Image;
use crate::colors::{ColorMode, alter_colors};
use crate::convolution::{self, EdgeProcessing, Kernel, KernelOrigin, NamedKernel};
use crate::error::Result;
use crate::resize::{resize, resize_smooth};
use crate::rotate::rotate;

/// A built-in kernel by name, or a user-supplied weight matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KernelSpec {
    Named(NamedKernel),
    Custom(Vec<Vec<f32>>),
}

impl KernelSpec {
    pub fn kernel(&self) -> Result<Kernel> {
        match self {
            KernelSpec::Named(named) => Ok(named.kernel()),
            KernelSpec::Custom(rows) => Kernel::new(rows.clone()),
        }
    }
}

impl From<NamedKernel> for KernelSpec {
    fn from(named: NamedKernel) -> Self {
        KernelSpec::Named(named)
    }
}

/// One image transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    AlterColors {
        mode: ColorMode,
    },
    ApplyKernel {
        kernel: KernelSpec,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        origin: Option<KernelOrigin>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        edge: Option<EdgeProcessing>,
    },
    Rotate {
        degrees: f64,
    },
    Resize {
        scale: f32,
        #[serde(default)]
        smooth: bool,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::AlterColors { .. } => "alter_colors",
            Operation::ApplyKernel { .. } => "apply_kernel",
            Operation::Rotate { .. } => "rotate",
            Operation::Resize { .. } => "resize",
        }
    }

    /// Apply this transformation, returning a new image.
    pub fn apply(&self, image: &Image) -> Result<Image> {
        let output = match self {
            Operation::AlterColors { mode } => alter_colors(image, *mode)?,
            Operation::ApplyKernel {
                kernel,
                origin,
                edge,
            } => convolution::apply(
                image,
                &kernel.kernel()?,
                origin.unwrap_or_default(),
                edge.unwrap_or_default(),
            )?,
            Operation::Rotate { degrees } => rotate(image, *degrees)?,
            Operation::Resize { scale, smooth } => {
                if *smooth {
                    resize_smooth(image, *scale)?
                } else {
                    resize(image, *scale)?
                }
            }
        };

        info!(
            op = self.name(),
            input_width = image.width(),
            input_height = image.height(),
            output_width = output.width(),
            output_height = output.height(),
            "Applied operation"
        );
        Ok(output)
    }
}

/// Apply `operations` in order.
pub fn apply_all(image: &Image, operations: &[Operation]) -> Result<Image> {
    let mut current = image.duplicate();
    for operation in operations {
        current = operation.apply(&current)?;
    }
    Ok(current)
}
