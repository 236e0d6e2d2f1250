//! Window evaluation engine
//!
//! Slides one [`Statistic`] over a raster. Two sampling modes exist:
//!
//! - **Sliding** (`skip_block == 0`): the statistic is evaluated on every
//!   `window_size x window_size` window that fits inside the raster and the
//!   result is stored at the window center. Cells closer than half a window
//!   to the border keep their initial value (0, or the input value for
//!   [`Statistic::Majority`]).
//! - **Block decimation** (`skip_block > 0`): the raster is tiled into
//!   `skip_block x skip_block` cells (partial tiles at the right and bottom
//!   edges included) and each tile produces one output sample.
//!
//! A target value restricts evaluation to windows whose center equals it;
//! other centers are copied through. Iterations feed each pass the output
//! of the previous one.
//!
//! # See also
//!
//! - [`crate::statistic`] for the per-window functions

use crate::statistic::{StatContext, StatScratch, Statistic};
use crate::{FilterError, FilterResult};
use focal_core::{FRaster, Window};
use focal_morph::{GrayOpen, MorphOpen};
use log::debug;

/// Default window size
pub const DEFAULT_WINDOW_SIZE: usize = 3;

/// Default number of passes
pub const DEFAULT_ITERATIONS: usize = 1;

/// Options for [`evaluate`]
#[derive(Debug, Clone)]
pub struct WindowOptions {
    /// Odd side length of the sliding window
    pub window_size: usize,
    /// Tile size for block decimation; 0 selects sliding windows
    pub skip_block: usize,
    /// Only windows whose center equals this value are evaluated
    pub target_value: Option<f32>,
    /// Cells equal to this value are left out of the statistic
    pub ignore_value: Option<f32>,
    /// Number of passes, each applied to the previous output
    pub iterations: usize,
    /// Weight kernel for the mean; defaults to all ones
    pub weights: Option<FRaster>,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            skip_block: 0,
            target_value: None,
            ignore_value: None,
            iterations: DEFAULT_ITERATIONS,
            weights: None,
        }
    }
}

impl WindowOptions {
    /// Set the window size
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the decimation tile size
    pub fn with_skip_block(mut self, skip_block: usize) -> Self {
        self.skip_block = skip_block;
        self
    }

    /// Set the target value
    pub fn with_target_value(mut self, value: f32) -> Self {
        self.target_value = Some(value);
        self
    }

    /// Set the ignore value
    pub fn with_ignore_value(mut self, value: f32) -> Self {
        self.ignore_value = Some(value);
        self
    }

    /// Set the number of passes
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the weight kernel
    pub fn with_weights(mut self, weights: FRaster) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Side length of the window the statistic sees
    fn kernel_size(&self) -> usize {
        if self.skip_block > 0 { self.skip_block } else { self.window_size }
    }

    fn validate(&self, raster: &FRaster) -> FilterResult<()> {
        if self.iterations == 0 {
            return Err(FilterError::InvalidParameters("iterations must be >= 1".into()));
        }
        if self.skip_block == 0 {
            raster.check_window_size(self.window_size)?;
        }
        if let Some(weights) = &self.weights {
            let k = self.kernel_size();
            weights.check_shape((k, k))?;
        }
        Ok(())
    }
}

/// Evaluate `statistic` over `raster`
///
/// [`Statistic::Morph`] uses the default grayscale opening.
///
/// # Errors
///
/// Returns an error if the window size is even or larger than the raster,
/// if `iterations` is 0, if the weight kernel does not match the window, or
/// if the statistic itself fails.
///
/// # Examples
///
/// ```
/// use focal_core::FRaster;
/// use focal_filter::{Statistic, WindowOptions, evaluate};
///
/// let raster = FRaster::new_with_value(6, 6, 2.0).unwrap();
/// let out = evaluate(&raster, Statistic::Mean, &WindowOptions::default()).unwrap();
/// assert_eq!(out.get(2, 2).unwrap(), 2.0);
/// assert_eq!(out.get(0, 0).unwrap(), 0.0);
/// ```
pub fn evaluate(
    raster: &FRaster,
    statistic: Statistic,
    options: &WindowOptions,
) -> FilterResult<FRaster> {
    evaluate_with(raster, statistic, options, &GrayOpen)
}

/// Evaluate `statistic` over `raster` with an explicit opening implementation
pub fn evaluate_with(
    raster: &FRaster,
    statistic: Statistic,
    options: &WindowOptions,
    opener: &dyn MorphOpen,
) -> FilterResult<FRaster> {
    options.validate(raster)?;
    debug!(
        "evaluate: {} on {}x{}, window {}, skip_block {}, iterations {}",
        statistic,
        raster.rows(),
        raster.cols(),
        options.window_size,
        options.skip_block,
        options.iterations
    );

    let ctx = StatContext {
        ignore_value: options.ignore_value,
        weights: options.weights.as_ref(),
    };
    let mut scratch = StatScratch::for_window(options.kernel_size());

    let mut current = if options.skip_block > 0 {
        decimate(raster, statistic, options, &ctx, &mut scratch, opener)?
    } else {
        slide(raster, statistic, options, &ctx, &mut scratch, opener)?
    };

    for _ in 1..options.iterations {
        current = if options.skip_block > 0 {
            decimate(&current, statistic, options, &ctx, &mut scratch, opener)?
        } else {
            current.check_window_size(options.window_size)?;
            slide(&current, statistic, options, &ctx, &mut scratch, opener)?
        };
    }

    Ok(current)
}

/// Evaluate one window, passing the center through when it misses the target
fn evaluate_window(
    block: &Window<'_, f32>,
    statistic: Statistic,
    options: &WindowOptions,
    ctx: &StatContext<'_>,
    scratch: &mut StatScratch,
    opener: &dyn MorphOpen,
) -> FilterResult<f32> {
    if let Some(target) = options.target_value {
        let center = block.center();
        if center != target {
            return Ok(center);
        }
    }
    statistic.evaluate_with(block, ctx, scratch, opener)
}

fn slide(
    raster: &FRaster,
    statistic: Statistic,
    options: &WindowOptions,
    ctx: &StatContext<'_>,
    scratch: &mut StatScratch,
    opener: &dyn MorphOpen,
) -> FilterResult<FRaster> {
    let (rows, cols) = raster.shape();
    let size = options.window_size;
    let half = size / 2;

    let mut out = if statistic == Statistic::Majority {
        raster.clone()
    } else {
        FRaster::new(rows, cols)?
    };

    for r in 0..=rows - size {
        for c in 0..=cols - size {
            let block = raster.window(r, c, size, size)?;
            let value = evaluate_window(&block, statistic, options, ctx, scratch, opener)?;
            out.set_unchecked(r + half, c + half, value);
        }
    }

    Ok(out)
}

fn decimate(
    raster: &FRaster,
    statistic: Statistic,
    options: &WindowOptions,
    ctx: &StatContext<'_>,
    scratch: &mut StatScratch,
    opener: &dyn MorphOpen,
) -> FilterResult<FRaster> {
    let (rows, cols) = raster.shape();
    let skip = options.skip_block;
    let out_rows = rows.div_ceil(skip);
    let out_cols = cols.div_ceil(skip);
    let mut out = FRaster::new(out_rows, out_cols)?;

    for tr in 0..out_rows {
        for tc in 0..out_cols {
            let block = raster.clipped_window(tr * skip, tc * skip, skip, skip);
            let value = evaluate_window(&block, statistic, options, ctx, scratch, opener)?;
            out.set_unchecked(tr, tc, value);
        }
    }

    Ok(out)
}
