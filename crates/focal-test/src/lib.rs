//! focal-test - Regression test framework for focal operators
//!
//! Every crate's `tests/*_reg.rs` file drives a [`RegParams`]: each check
//! is numbered, failures are collected, and [`RegParams::cleanup`] reports
//! the outcome. Test rasters are synthesized in code.
//!
//! # Usage
//!
//! ```ignore
//! use focal_test::RegParams;
//!
//! let mut rp = RegParams::new("mean");
//! rp.compare_values(4.0, out.get(2, 2).unwrap() as f64, 1e-6);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" (default) or "display". Display
//!   mode additionally prints every raster handed to [`RegParams::show`].

mod params;

pub use params::{RegParams, RegTestMode};

use focal_core::{ByteRaster, FRaster};

/// Build a float raster from nested rows
///
/// # Panics
///
/// Panics if the rows are empty or ragged.
pub fn raster_from_rows<R: AsRef<[f32]>>(rows: &[R]) -> FRaster {
    FRaster::from_rows(rows).expect("test raster rows must be rectangular")
}

/// Build a byte raster from nested rows
///
/// # Panics
///
/// Panics if the rows are empty or ragged.
pub fn mask_from_rows<R: AsRef<[u8]>>(rows: &[R]) -> ByteRaster {
    ByteRaster::from_rows(rows).expect("test mask rows must be rectangular")
}

/// Deterministic pseudo-random float raster with values in `0..modulus`
pub fn pattern_raster(rows: usize, cols: usize, modulus: u32) -> FRaster {
    let data = (0..rows * cols)
        .map(|i| {
            let r = (i / cols) as u32;
            let c = (i % cols) as u32;
            ((r * 7 + c * 13 + r * c * 3) % modulus) as f32
        })
        .collect();
    FRaster::from_data(rows, cols, data).expect("pattern raster dimensions must be non-zero")
}
