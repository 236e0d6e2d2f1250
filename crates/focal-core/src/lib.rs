//! Focal Core - basic data structures for focal-window raster analysis
//!
//! This crate provides the primitives shared by every focal operator:
//!
//! - [`Raster`] / [`FRaster`] / [`ByteRaster`] - dense 2-D sample grids
//! - [`Window`] - borrowed rectangular view used as the block sampler
//! - [`RasterStack`] - same-shape bands on a leading axis
//! - [`line`] - Bresenham line rasterization and direction queries

pub mod error;
pub mod line;
pub mod raster;
pub mod stack;

pub use error::{Error, Result};
pub use line::{LineBuffer, line_angle, rasterize, rasterize_into};
pub use raster::{ByteRaster, FRaster, Raster, Window};
pub use stack::RasterStack;

/// Conventional "unset" value for target and ignore parameters
pub const SENTINEL: f32 = -9999.0;

/// Translate a raw parameter value into an optional filter value
///
/// Returns `None` when `value` equals [`SENTINEL`].
#[inline]
pub fn from_sentinel(value: f32) -> Option<f32> {
    if value == SENTINEL { None } else { Some(value) }
}
