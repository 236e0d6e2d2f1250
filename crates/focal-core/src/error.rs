//! Error types for focal-core
//!
//! Provides a unified error type for raster construction and access.
//! Higher-level crates wrap this type in their own error enums.

use thiserror::Error;

/// focal-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid raster dimensions
    #[error("invalid raster dimensions: {rows}x{cols}")]
    InvalidDimension { rows: usize, cols: usize },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Two rasters (or a raster and a kernel) disagree in shape
    #[error(
        "shape mismatch: expected {}x{}, got {}x{}",
        .expected.0,
        .expected.1,
        .actual.0,
        .actual.1
    )]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for focal-core operations
pub type Result<T> = std::result::Result<T, Error>;
