//! Error types for focal-edge

use thiserror::Error;

/// Errors that can occur during edge linking and saliency analysis
#[derive(Debug, Error)]
pub enum EdgeError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] focal_core::Error),

    /// Filter library error
    #[error("filter error: {0}")]
    Filter(#[from] focal_filter::FilterError),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for edge operations
pub type EdgeResult<T> = Result<T, EdgeError>;
