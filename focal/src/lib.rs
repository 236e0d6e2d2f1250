//! Focal - moving-window raster analysis
//!
//! Per-pixel statistics over a sliding neighborhood, plus the edge
//! structure operators used to clean up and characterize edge gradient
//! magnitude (EGM) rasters.
//!
//! # Overview
//!
//! - Window statistics: mean, min, max, sum, percent, majority, median and
//!   duda contrast, with target/ignore values, weights, block decimation
//!   and iteration
//! - Endpoint linking of binary edge masks
//! - Orientation, linearity and saliency of EGM rasters
//! - Surround inhibition, hole filling and circle filling
//! - Spectral and RGB distance
//!
//! [`apply`] routes an operation name to the matching operator.
//!
//! # Example
//!
//! ```
//! use focal::{ApplyParams, FRaster, RasterStack, apply_named};
//!
//! let image = RasterStack::from(FRaster::new_with_value(6, 6, 1.0).unwrap());
//! let out = apply_named(&image, "percent", &ApplyParams::default()).unwrap();
//! assert_eq!(out.band(0).unwrap().get(2, 2).unwrap(), 100.0);
//! ```

pub mod apply;
mod error;

// Re-export core types (primary data structures used everywhere)
pub use focal_core::*;

// Re-export operator crates as modules to avoid name conflicts
pub use focal_edge as edge;
pub use focal_filter as filter;
pub use focal_morph as morph;

pub use apply::{ApplyParams, Operation, apply, apply_named};
pub use error::{FocalError, FocalResult};
