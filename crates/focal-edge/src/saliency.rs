//! Edge orientation, linearity and saliency
//!
//! Three full-raster passes over an EGM raster, each consuming the
//! complete output of the previous one:
//!
//! 1. **Orientation**: for every edge pixel, lines are cast from the
//!    window center to each cell of the window's top and bottom rows and
//!    left and right columns. The line with the largest leading EGM sum
//!    is the optimal direction; its angle, sum, length, endpoint and the
//!    orthogonal contrast run are recorded.
//! 2. **Linearity**: the largest `|cos|` of the angle difference between
//!    a pixel's optimal direction and the directions recorded along its
//!    optimal line.
//! 3. **Saliency**: `sum * length * contrast` where linearity is positive.
//!
//! The output is a two-band stack `[linearity, saliency]`.

use crate::EdgeResult;
use focal_core::{
    FRaster, LineBuffer, Raster, RasterStack, SENTINEL, Window, line_angle, rasterize_into,
};
use focal_filter::line_stats::{run_below, sum_while_above};
use log::debug;

/// Default saliency window size
pub const DEFAULT_SALIENCY_WINDOW: usize = 5;

/// Default EGM a pixel must exceed to be treated as an edge
pub const DEFAULT_EDGE_FLOOR: f32 = 1.0;

/// Default EGM below which a line sum stops accumulating
pub const DEFAULT_LINE_FLOOR: f32 = 5.0;

/// Options for [`saliency`]
#[derive(Debug, Clone)]
pub struct SaliencyOptions {
    /// Window size, odd
    pub window_size: usize,
    /// Pixels with EGM above this are analyzed
    pub edge_floor: f32,
    /// Line sums stop at the first sample at or below this
    pub line_floor: f32,
}

impl Default for SaliencyOptions {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_SALIENCY_WINDOW,
            edge_floor: DEFAULT_EDGE_FLOOR,
            line_floor: DEFAULT_LINE_FLOOR,
        }
    }
}

impl SaliencyOptions {
    /// Set the window size
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the edge floor
    pub fn with_edge_floor(mut self, edge_floor: f32) -> Self {
        self.edge_floor = edge_floor;
        self
    }

    /// Set the line floor
    pub fn with_line_floor(mut self, line_floor: f32) -> Self {
        self.line_floor = line_floor;
        self
    }
}

/// Optimal-direction record of one pixel
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    /// Direction of the optimal line in radians
    pub theta: f32,
    /// Leading EGM sum along the optimal line
    pub sum: f32,
    /// Pixels contributing to `sum`
    pub count: usize,
    /// Run of pixels below the center EGM along the orthogonal line
    pub contrast: usize,
    /// Window-relative end of the optimal line, if any line scored
    pub end: Option<(usize, usize)>,
}

struct LineScratch {
    line: LineBuffer,
    samples: Vec<f32>,
}

impl LineScratch {
    fn for_window(window_size: usize) -> Self {
        Self {
            line: LineBuffer::for_window(window_size),
            samples: Vec::with_capacity(window_size * 2),
        }
    }
}

/// Window-relative line ends: top and bottom rows, then left and right columns
fn border_targets(size: usize) -> impl Iterator<Item = (usize, usize)> {
    let last = size - 1;
    let rows = [0, last]
        .into_iter()
        .flat_map(move |r| (0..size).map(move |c| (r, c)));
    let cols = [0, last]
        .into_iter()
        .flat_map(move |c| (0..size).map(move |r| (r, c)));
    rows.chain(cols)
}

/// End of the line through the center rotated 90 degrees from `(row, col)`
fn orthogonal_end(row: usize, col: usize, half: usize) -> (usize, usize) {
    ((col as i64 - 2 * half as i64).unsigned_abs() as usize, row)
}

/// Optimal direction of the window center
fn orient(block: &Window<'_, f32>, line_floor: f32, scratch: &mut LineScratch) -> Orientation {
    let size = block.rows();
    let half = size / 2;
    let h = half as i32;
    let center = block.center();
    let mut best = Orientation::default();

    for (end_r, end_c) in border_targets(size) {
        rasterize_into(&mut scratch.line, h, h, end_r as i32, end_c as i32);
        block.sample_line(&scratch.line, &mut scratch.samples);
        let (sum, count) = sum_while_above(&scratch.samples, line_floor);
        if sum <= best.sum {
            continue;
        }

        let theta = line_angle((h, h), (end_r as i32, end_c as i32), size);
        let (or, oc) = orthogonal_end(end_r, end_c, half);
        rasterize_into(&mut scratch.line, h, h, or as i32, oc as i32);
        block.sample_line(&scratch.line, &mut scratch.samples);
        let contrast = run_below(&scratch.samples, center, 1);

        best = Orientation {
            theta,
            sum,
            count,
            contrast,
            end: Some((end_r, end_c)),
        };
    }

    best
}

/// Largest `|cos(theta' - theta)|` along the line to `end` over the angle raster
///
/// The center sample is skipped and the scan stops at the first unset
/// angle. Returns 0 when no angle was sampled.
fn linearity(
    angles: &Window<'_, f32>,
    theta: f32,
    end: (usize, usize),
    scratch: &mut LineScratch,
) -> f32 {
    let h = (angles.rows() / 2) as i32;
    rasterize_into(&mut scratch.line, h, h, end.0 as i32, end.1 as i32);
    angles.sample_line(&scratch.line, &mut scratch.samples);
    scratch
        .samples
        .iter()
        .skip(1)
        .take_while(|&&v| v > SENTINEL)
        .map(|&v| (v - theta).cos().abs())
        .fold(0.0, f32::max)
}

/// Compute `[linearity, saliency]` for an EGM raster
///
/// Pixels within half a window of the border, and pixels whose EGM does
/// not exceed `edge_floor`, score 0 in both bands.
///
/// # Errors
///
/// Returns an error if the window size is even or larger than the raster.
///
/// # Examples
///
/// ```
/// use focal_core::FRaster;
/// use focal_edge::{SaliencyOptions, saliency};
///
/// let egm = FRaster::new(7, 7).unwrap();
/// let stack = saliency(&egm, &SaliencyOptions::default()).unwrap();
/// assert_eq!(stack.band_count(), 2);
/// ```
pub fn saliency(egm: &FRaster, options: &SaliencyOptions) -> EdgeResult<RasterStack> {
    let size = options.window_size;
    let half = egm.check_window_size(size)?;
    let (rows, cols) = egm.shape();
    debug!("saliency: {rows}x{cols}, window {size}");

    let mut scratch = LineScratch::for_window(size);
    let mut records: Raster<Orientation> = Raster::new(rows, cols)?;
    let mut angles = FRaster::new_with_value(rows, cols, SENTINEL)?;

    let mut oriented = 0usize;
    for r in half..rows - half {
        for c in half..cols - half {
            if egm.get_unchecked(r, c) <= options.edge_floor {
                continue;
            }
            let block = egm.centered_window(r, c, size)?;
            let record = orient(&block, options.line_floor, &mut scratch);
            records.set_unchecked(r, c, record);
            angles.set_unchecked(r, c, record.theta);
            oriented += 1;
        }
    }

    let mut linear = FRaster::new(rows, cols)?;
    for r in half..rows - half {
        for c in half..cols - half {
            let theta = angles.get_unchecked(r, c);
            if theta <= SENTINEL {
                continue;
            }
            let Some(end) = records.get_unchecked(r, c).end else {
                continue;
            };
            let block = angles.centered_window(r, c, size)?;
            linear.set_unchecked(r, c, linearity(&block, theta, end, &mut scratch));
        }
    }

    let mut salient = FRaster::new(rows, cols)?;
    for r in half..rows - half {
        for c in half..cols - half {
            if linear.get_unchecked(r, c) > 0.0 {
                let rec = records.get_unchecked(r, c);
                salient.set_unchecked(r, c, rec.sum * rec.count as f32 * rec.contrast as f32);
            }
        }
    }

    debug!("saliency: {oriented} edge pixels oriented");
    Ok(RasterStack::new(vec![linear, salient])?)
}
