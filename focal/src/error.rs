//! Error types for the focal entry point

use thiserror::Error;

/// Errors returned by [`crate::apply`]
#[derive(Debug, Error)]
pub enum FocalError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] focal_core::Error),

    /// Morphology error
    #[error("morphology error: {0}")]
    Morph(#[from] focal_morph::MorphError),

    /// Filter error
    #[error("filter error: {0}")]
    Filter(#[from] focal_filter::FilterError),

    /// Edge operator error
    #[error("edge error: {0}")]
    Edge(#[from] focal_edge::EdgeError),

    /// Operation name not in the supported set
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A raster the operation needs was not supplied
    #[error("missing input: {0}")]
    MissingInput(&'static str),
}

/// Result type for the focal entry point
pub type FocalResult<T> = Result<T, FocalError>;
