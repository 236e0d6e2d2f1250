//! Error types for focal-filter

use thiserror::Error;

/// Errors that can occur during focal filtering
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] focal_core::Error),

    /// Morphology error
    #[error("morphology error: {0}")]
    Morph(#[from] focal_morph::MorphError),

    /// Statistic name not in the supported set
    #[error("unsupported statistic: {0}")]
    UnsupportedStatistic(String),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for filtering operations
pub type FilterResult<T> = Result<T, FilterError>;
