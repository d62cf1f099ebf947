//! Error type shared by every engine operation.

/// Errors that can occur while decoding, encoding or transforming a bitmap.
#[derive(Debug, thiserror::Error)]
pub enum BitmapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid bitmap format: {0}")]
    Format(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    #[error("Pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("Sidecar metadata error: {0}")]
    Sidecar(#[from] serde_json::Error),

    #[error("Image conversion error: {0}")]
    Conversion(#[from] ::image::ImageError),
}

/// Result type alias for bitmap operations.
pub type Result<T> = std::result::Result<T, BitmapError>;
