//! Multi-level surround inhibition of edge gradient magnitude
//!
//! Each pixel's EGM is reduced by the ratio of a weighted "surround" term
//! to a plain "inside" term taken over its window. Strong responses in the
//! surround (texture) suppress the center, isolated contours survive.
//!
//! The surround kernels are fixed for window sizes 3, 5 and 7. A cell
//! contributes to the surround term when its kernel weight is non-zero and
//! it is off the main diagonal; every other cell contributes to the inside
//! term.
//!
//! # See also
//!
//! Papari and Campisi (2007), multilevel surround inhibition.

use crate::{FilterError, FilterResult};
use focal_core::FRaster;
use log::debug;

/// Default inhibition levels
pub const DEFAULT_INHIBITION_SCALES: [f32; 4] = [1.0, 0.75, 0.5, 0.25];

/// Default window size
pub const DEFAULT_INHIBITION_WINDOW: usize = 3;

const SURROUND_3: [[f32; 3]; 3] = [[0.0, 1.0, 0.0], [1.0, 0.0, 1.0], [0.0, 1.0, 0.0]];

const SURROUND_5: [[f32; 5]; 5] = [
    [1.0, 0.75, 0.0, 0.75, 1.0],
    [0.75, 0.1, 0.0, 0.1, 0.75],
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [0.75, 0.1, 0.0, 0.1, 0.75],
    [1.0, 0.75, 0.0, 0.75, 1.0],
];

const SURROUND_7: [[f32; 7]; 7] = [
    [0.0, 1.0, 0.75, 0.0, 0.75, 1.0, 0.0],
    [1.0, 0.5, 0.25, 0.0, 0.25, 0.5, 1.0],
    [0.75, 0.25, 0.01, 0.0, 0.01, 0.25, 0.75],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.75, 0.25, 0.01, 0.0, 0.01, 0.25, 0.75],
    [1.0, 0.5, 0.25, 0.0, 0.25, 0.5, 1.0],
    [0.0, 1.0, 0.75, 0.0, 0.75, 1.0, 0.0],
];

/// Options for [`inhibit`]
#[derive(Debug, Clone)]
pub struct InhibitionOptions {
    /// Window size: 3, 5 or 7
    pub window_size: usize,
    /// Inhibition levels; the output averages `center - s * T / I` over them
    pub scales: Vec<f32>,
}

impl Default for InhibitionOptions {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_INHIBITION_WINDOW,
            scales: DEFAULT_INHIBITION_SCALES.to_vec(),
        }
    }
}

impl InhibitionOptions {
    /// Set the window size
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the inhibition levels
    pub fn with_scales(mut self, scales: Vec<f32>) -> Self {
        self.scales = scales;
        self
    }
}

/// Surround kernel for `window_size`
///
/// # Errors
///
/// Returns `FilterError::InvalidParameters` unless `window_size` is 3, 5 or 7.
pub fn surround_kernel(window_size: usize) -> FilterResult<FRaster> {
    let kernel = match window_size {
        3 => FRaster::from_rows(&SURROUND_3)?,
        5 => FRaster::from_rows(&SURROUND_5)?,
        7 => FRaster::from_rows(&SURROUND_7)?,
        _ => {
            return Err(FilterError::InvalidParameters(format!(
                "inhibition window must be 3, 5 or 7, got {window_size}"
            )));
        }
    };
    Ok(kernel)
}

/// Apply surround inhibition to an EGM raster
///
/// For each pixel whose window fits, `T` is the mean of `egm * k` over
/// surround cells and `I` the mean of `egm` over inside cells. The output
/// is the mean over scales `s` of `center - s * T / I`. When either cell
/// set is empty or `I` is 0 the output is 0. Border pixels are 0.
///
/// # Errors
///
/// Returns an error for unsupported window sizes, an empty scale list, or
/// a window larger than the raster.
pub fn inhibit(egm: &FRaster, options: &InhibitionOptions) -> FilterResult<FRaster> {
    let kernel = surround_kernel(options.window_size)?;
    if options.scales.is_empty() {
        return Err(FilterError::InvalidParameters("inhibition needs at least one scale".into()));
    }
    let size = options.window_size;
    let half = egm.check_window_size(size)?;
    let mean_scale = options.scales.iter().sum::<f32>() / options.scales.len() as f32;
    debug!(
        "inhibit: {}x{}, window {size}, {} scales",
        egm.rows(),
        egm.cols(),
        options.scales.len()
    );

    let (rows, cols) = egm.shape();
    let mut out = FRaster::new(rows, cols)?;

    for r in 0..=rows - size {
        for c in 0..=cols - size {
            let block = egm.window(r, c, size, size)?;
            let (mut surround, mut n_surround) = (0.0f32, 0usize);
            let (mut inside, mut n_inside) = (0.0f32, 0usize);

            for (br, bc, v) in block.indexed() {
                let k = kernel.get_unchecked(br, bc);
                if br != bc && k != 0.0 {
                    surround += v * k;
                    n_surround += 1;
                } else {
                    inside += v;
                    n_inside += 1;
                }
            }

            if n_surround == 0 || n_inside == 0 || inside == 0.0 {
                continue;
            }
            let ratio = (surround / n_surround as f32) / (inside / n_inside as f32);
            // mean over s of (center - s * ratio)
            out.set_unchecked(r + half, c + half, block.center() - mean_scale * ratio);
        }
    }

    Ok(out)
}
