//! RasterStack - band-stacked rasters
//!
//! A stack holds one or more same-shape [`FRaster`] bands on a leading
//! axis. It carries 3-band color input for the RGB distance operator and
//! the `[linearity, saliency]` pair produced by the saliency engine.

use crate::error::{Error, Result};
use crate::raster::FRaster;

/// Same-shape floating-point bands
#[derive(Debug, Clone, PartialEq)]
pub struct RasterStack {
    bands: Vec<FRaster>,
}

impl RasterStack {
    /// Create a stack from bands
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if `bands` is empty and
    /// `Error::ShapeMismatch` if the bands differ in shape.
    pub fn new(bands: Vec<FRaster>) -> Result<Self> {
        let first = bands
            .first()
            .ok_or_else(|| Error::InvalidParameter("raster stack needs at least one band".into()))?
            .shape();
        for band in &bands[1..] {
            band.check_shape(first)?;
        }
        Ok(RasterStack { bands })
    }

    /// Number of bands
    #[inline]
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Shape `(rows, cols)` shared by every band
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.bands[0].shape()
    }

    /// Borrow band `index`
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if there is no such band.
    pub fn band(&self, index: usize) -> Result<&FRaster> {
        self.bands.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: self.bands.len(),
        })
    }
}

impl From<FRaster> for RasterStack {
    fn from(raster: FRaster) -> Self {
        RasterStack {
            bands: vec![raster],
        }
    }
}
