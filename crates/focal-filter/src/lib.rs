//! focal-filter - Focal statistics and window filters
//!
//! This crate provides the moving-window computations:
//!
//! - [`statistic`]: pure per-window statistics (mean, min, max, sum,
//!   percent, majority, median, duda contrast, directional opening)
//! - [`window`]: the evaluation engine that slides a statistic over a
//!   raster, with target/ignore filtering, weights, block decimation and
//!   iteration
//! - [`distance`]: weighted spectral distance and RGB color distance
//! - [`inhibition`]: multi-level surround inhibition of EGM rasters
//! - [`line_stats`]: reductions over samples taken along rasterized lines

pub mod distance;
mod error;
pub mod inhibition;
pub mod line_stats;
pub mod statistic;
pub mod window;

pub use distance::{default_distance_weights, distance, rgb_distance};
pub use error::{FilterError, FilterResult};
pub use inhibition::{InhibitionOptions, inhibit, surround_kernel};
pub use statistic::{StatContext, StatScratch, Statistic};
pub use window::{WindowOptions, evaluate, evaluate_with};
