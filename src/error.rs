// One error type for the whole pipeline.
// Every variant states *where* things went wrong.
use thiserror::Error;

use crate::types::BufferMode;

#[derive(Debug, Error)]
pub enum Error {
    /// The engine buffer (or the output buffer) is not the size the dimensions promise.
    /// Nothing is drawn for that frame.
    #[error("dimension mismatch in {mode:?} mode: expected {expected} bytes, got {actual}")]
    DimensionMismatch {
        mode: BufferMode,
        expected: usize,
        actual: usize,
    },

    /// The engine's buffer claims a different mode than the engine declared.
    #[error("engine declared {declared:?} output but its buffer is {actual:?}")]
    ModeMismatch {
        declared: BufferMode,
        actual: BufferMode,
    },

    /// A navigation parameter could not be used. Callers swap in the default.
    #[error("invalid navigation parameter {name}={value:?}")]
    InvalidParameter { name: &'static str, value: String },

    /// Width or height of zero at startup.
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("window init error: {0}")]
    WindowInit(String), // Creating the window failed

    #[error("window update error: {0}")]
    WindowUpdate(String), // Pushing the frame to the window failed

    #[error("snapshot error: {0}")]
    Snapshot(#[from] image::ImageError),
}
