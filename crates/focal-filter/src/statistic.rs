//! Per-window statistics
//!
//! Each statistic maps one window view to a scalar. Cells equal to the
//! ignore value, when one is set, are left out of every sum, count and
//! average. A window with no qualifying cells yields 0.
//!
//! The set of statistics is closed; [`Statistic`] dispatches to the pure
//! functions in this module and is resolved once per evaluation call.
//!
//! # See also
//!
//! - [`crate::window`] for sliding a statistic over a raster

use crate::{FilterError, FilterResult};
use focal_core::{FRaster, Window};
use focal_morph::{GrayOpen, MorphOpen, directional_open_center};
use std::fmt;
use std::str::FromStr;

/// Focal statistic selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    /// Weighted mean of qualifying cells
    Mean,
    /// Minimum of qualifying cells
    Min,
    /// Maximum of qualifying cells
    Max,
    /// Sum of qualifying cells
    Sum,
    /// `100 * sum / count` over qualifying cells
    Percent,
    /// Most frequent value
    Majority,
    /// Middle value of the sorted window
    Median,
    /// Center contrast against opposite border pairs
    Duda,
    /// Opening along the lowest-variance direction (5x5 windows)
    Morph,
}

impl Statistic {
    /// All statistics, in declaration order
    pub const ALL: [Statistic; 9] = [
        Statistic::Mean,
        Statistic::Min,
        Statistic::Max,
        Statistic::Sum,
        Statistic::Percent,
        Statistic::Majority,
        Statistic::Median,
        Statistic::Duda,
        Statistic::Morph,
    ];

    /// Lower-case name
    pub fn as_str(self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Sum => "sum",
            Statistic::Percent => "percent",
            Statistic::Majority => "majority",
            Statistic::Median => "median",
            Statistic::Duda => "duda",
            Statistic::Morph => "morph",
        }
    }

    /// Evaluate on one window using the default opening for [`Statistic::Morph`]
    pub fn evaluate(
        self,
        block: &Window<'_, f32>,
        ctx: &StatContext<'_>,
        scratch: &mut StatScratch,
    ) -> FilterResult<f32> {
        self.evaluate_with(block, ctx, scratch, &GrayOpen)
    }

    /// Evaluate on one window with an explicit opening implementation
    pub fn evaluate_with(
        self,
        block: &Window<'_, f32>,
        ctx: &StatContext<'_>,
        scratch: &mut StatScratch,
        opener: &dyn MorphOpen,
    ) -> FilterResult<f32> {
        let value = match self {
            Statistic::Mean => mean(block, ctx),
            Statistic::Min => min(block, ctx),
            Statistic::Max => max(block, ctx),
            Statistic::Sum => sum(block, ctx),
            Statistic::Percent => percent(block, ctx),
            Statistic::Majority => majority(block, ctx, scratch),
            Statistic::Median => median(block, scratch),
            Statistic::Duda => duda(block),
            Statistic::Morph => directional_open_center(block, opener)?,
        };
        Ok(value)
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Statistic {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Statistic::ALL
            .into_iter()
            .find(|stat| stat.as_str() == s)
            .ok_or_else(|| FilterError::UnsupportedStatistic(s.to_string()))
    }
}

/// Parameters shared by every statistic call in one evaluation
#[derive(Debug, Clone, Copy, Default)]
pub struct StatContext<'a> {
    /// Cells equal to this value are skipped
    pub ignore_value: Option<f32>,
    /// Multiplicative weights for the mean; indexed like the window
    pub weights: Option<&'a FRaster>,
}

impl StatContext<'_> {
    #[inline]
    fn counts(&self, v: f32) -> bool {
        self.ignore_value != Some(v)
    }

    #[inline]
    fn weight(&self, row: usize, col: usize) -> f32 {
        self.weights.map_or(1.0, |w| w.get_unchecked(row, col))
    }
}

/// Scratch space reused across windows so the statistics do not allocate
#[derive(Debug, Default)]
pub struct StatScratch {
    values: Vec<f32>,
    tallies: Vec<(f32, usize)>,
}

impl StatScratch {
    /// Create scratch space sized for `window_size x window_size` windows
    pub fn for_window(window_size: usize) -> Self {
        let n = window_size * window_size;
        StatScratch {
            values: Vec::with_capacity(n),
            tallies: Vec::with_capacity(n),
        }
    }
}

/// Weighted mean: sum of `value * weight` over qualifying cells divided by
/// the number of qualifying cells
pub fn mean(block: &Window<'_, f32>, ctx: &StatContext<'_>) -> f32 {
    let mut total = 0.0;
    let mut good = 0usize;
    for (r, c, v) in block.indexed() {
        if ctx.counts(v) {
            total += v * ctx.weight(r, c);
            good += 1;
        }
    }
    if good == 0 { 0.0 } else { total / good as f32 }
}

/// Minimum of qualifying cells
pub fn min(block: &Window<'_, f32>, ctx: &StatContext<'_>) -> f32 {
    block
        .iter()
        .filter(|&v| ctx.counts(v))
        .reduce(f32::min)
        .unwrap_or(0.0)
}

/// Maximum of qualifying cells
pub fn max(block: &Window<'_, f32>, ctx: &StatContext<'_>) -> f32 {
    block
        .iter()
        .filter(|&v| ctx.counts(v))
        .reduce(f32::max)
        .unwrap_or(0.0)
}

/// Sum of qualifying cells
pub fn sum(block: &Window<'_, f32>, ctx: &StatContext<'_>) -> f32 {
    block.iter().filter(|&v| ctx.counts(v)).sum()
}

/// `100 * (sum / count)` over qualifying cells
pub fn percent(block: &Window<'_, f32>, ctx: &StatContext<'_>) -> f32 {
    let (total, good) = block
        .iter()
        .filter(|&v| ctx.counts(v))
        .fold((0.0f32, 0usize), |(s, n), v| (s + v, n + 1));
    if good == 0 { 0.0 } else { total / good as f32 * 100.0 }
}

/// Most frequent value, compared by exact equality
///
/// Returns as soon as one value's running count exceeds half the window
/// size. Otherwise the value with the largest count wins, ties going to
/// the value seen first in row-major order.
pub fn majority(block: &Window<'_, f32>, ctx: &StatContext<'_>, scratch: &mut StatScratch) -> f32 {
    let tallies = &mut scratch.tallies;
    tallies.clear();
    let samples = block.len();

    for v in block.iter().filter(|&v| ctx.counts(v)) {
        let count = match tallies.iter_mut().find(|(value, _)| *value == v) {
            Some(entry) => {
                entry.1 += 1;
                entry.1
            }
            None => {
                tallies.push((v, 1));
                1
            }
        };
        if count * 2 > samples {
            return v;
        }
    }

    let mut best: Option<(f32, usize)> = None;
    for &(value, count) in tallies.iter() {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map_or(0.0, |(value, _)| value)
}

/// Middle element of the sorted window
pub fn median(block: &Window<'_, f32>, scratch: &mut StatScratch) -> f32 {
    let values = &mut scratch.values;
    values.clear();
    values.extend(block.iter());
    if values.is_empty() {
        return 0.0;
    }
    let mid = values.len() / 2;
    let (_, m, _) = values.select_nth_unstable_by(mid, f32::total_cmp);
    *m
}

/// Duda line/corner contrast
///
/// For the pairs (top-mid, bottom-mid), (top-left, bottom-right),
/// (mid-left, mid-right) and (bottom-left, top-right), whenever the center
/// `a` is strictly greater than both `b` and `c` the contrast is
/// `2a - b - c`. Returns the maximum contrast, or 0 if no pair qualifies.
pub fn duda(block: &Window<'_, f32>) -> f32 {
    let (last_r, last_c) = (block.rows() - 1, block.cols() - 1);
    let (mid_r, mid_c) = (block.rows() / 2, block.cols() / 2);
    let a = block.get(mid_r, mid_c);

    let pairs = [
        ((0, mid_c), (last_r, mid_c)),
        ((0, 0), (last_r, last_c)),
        ((mid_r, 0), (mid_r, last_c)),
        ((last_r, 0), (0, last_c)),
    ];

    pairs
        .iter()
        .map(|&((br, bc), (cr, cc))| (block.get(br, bc), block.get(cr, cc)))
        .filter(|&(b, c)| a > b && a > c)
        .map(|(b, c)| 2.0 * a - b - c)
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(rows: &[[f32; 3]]) -> FRaster {
        FRaster::from_rows(rows).unwrap()
    }

    fn whole(r: &FRaster) -> Window<'_, f32> {
        r.window(0, 0, r.rows(), r.cols()).unwrap()
    }

    #[test]
    fn test_parse_names() {
        for stat in Statistic::ALL {
            assert_eq!(stat.as_str().parse::<Statistic>().unwrap(), stat);
        }
        assert!(matches!(
            "mode".parse::<Statistic>(),
            Err(FilterError::UnsupportedStatistic(_))
        ));
    }

    #[test]
    fn test_mean_constant() {
        let r = FRaster::new_with_value(3, 3, 4.5).unwrap();
        assert_eq!(mean(&whole(&r), &StatContext::default()), 4.5);
    }

    #[test]
    fn test_mean_weights_and_ignore() {
        let r = raster(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let w = raster(&[[0.0, 0.0, 0.0], [0.0, 9.0, 0.0], [0.0, 0.0, 0.0]]);
        let ctx = StatContext {
            ignore_value: None,
            weights: Some(&w),
        };
        assert_eq!(mean(&whole(&r), &ctx), 5.0);

        let ctx = StatContext {
            ignore_value: Some(9.0),
            weights: None,
        };
        assert_eq!(mean(&whole(&r), &ctx), 36.0 / 8.0);
    }

    #[test]
    fn test_mean_all_ignored() {
        let r = FRaster::new_with_value(3, 3, -1.0).unwrap();
        let ctx = StatContext {
            ignore_value: Some(-1.0),
            weights: None,
        };
        assert_eq!(mean(&whole(&r), &ctx), 0.0);
        assert_eq!(percent(&whole(&r), &ctx), 0.0);
    }

    #[test]
    fn test_min_max_sum() {
        let r = raster(&[[3.0, -2.0, 8.0], [0.0, 5.0, 1.0], [7.0, 7.0, 2.0]]);
        let ctx = StatContext::default();
        assert_eq!(min(&whole(&r), &ctx), -2.0);
        assert_eq!(max(&whole(&r), &ctx), 8.0);
        assert_eq!(sum(&whole(&r), &ctx), 31.0);

        let ctx = StatContext {
            ignore_value: Some(8.0),
            weights: None,
        };
        assert_eq!(max(&whole(&r), &ctx), 7.0);
        assert_eq!(sum(&whole(&r), &ctx), 23.0);
    }

    #[test]
    fn test_percent() {
        let ones = FRaster::new_with_value(3, 3, 1.0).unwrap();
        assert_eq!(percent(&whole(&ones), &StatContext::default()), 100.0);

        let half = raster(&[[1.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 1.0]]);
        let ctx = StatContext {
            ignore_value: Some(0.0),
            weights: None,
        };
        assert_eq!(percent(&whole(&half), &ctx), 100.0);
        let p = percent(&whole(&half), &StatContext::default());
        assert!((p - 500.0 / 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_majority() {
        let r = raster(&[[1.0, 1.0, 2.0], [1.0, 2.0, 2.0], [1.0, 1.0, 1.0]]);
        let mut scratch = StatScratch::for_window(3);
        assert_eq!(majority(&whole(&r), &StatContext::default(), &mut scratch), 1.0);
    }

    #[test]
    fn test_majority_tie_first_seen() {
        let r = raster(&[[3.0, 4.0, 5.0], [4.0, 3.0, 6.0], [7.0, 8.0, 9.0]]);
        let mut scratch = StatScratch::for_window(3);
        assert_eq!(majority(&whole(&r), &StatContext::default(), &mut scratch), 3.0);
    }

    #[test]
    fn test_majority_ignores() {
        let r = raster(&[[0.0, 0.0, 0.0], [0.0, 0.0, 2.0], [5.0, 5.0, 2.0]]);
        let mut scratch = StatScratch::default();
        let ctx = StatContext {
            ignore_value: Some(0.0),
            weights: None,
        };
        assert_eq!(majority(&whole(&r), &ctx, &mut scratch), 2.0);
    }

    #[test]
    fn test_median() {
        let r = raster(&[[9.0, 1.0, 8.0], [2.0, 7.0, 3.0], [6.0, 4.0, 5.0]]);
        let mut scratch = StatScratch::default();
        assert_eq!(median(&whole(&r), &mut scratch), 5.0);
    }

    #[test]
    fn test_duda() {
        // The mid-left/mid-right pair gives the strongest contrast
        let r = raster(&[[9.0, 9.0, 9.0], [1.0, 9.5, 2.0], [9.0, 9.0, 9.0]]);
        assert!((duda(&whole(&r)) - 16.0).abs() < 1e-6);

        let flat = FRaster::new_with_value(3, 3, 4.0).unwrap();
        assert_eq!(duda(&whole(&flat)), 0.0);

        let peak = raster(&[[0.0, 1.0, 2.0], [3.0, 10.0, 4.0], [5.0, 6.0, 7.0]]);
        // pairs: (1,6)=13, (0,7)=13, (3,4)=13, (5,2)=13
        assert_eq!(duda(&whole(&peak)), 13.0);
    }

    #[test]
    fn test_evaluate_dispatch() {
        let r = raster(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let mut scratch = StatScratch::for_window(3);
        let ctx = StatContext::default();
        let b = whole(&r);
        assert_eq!(Statistic::Sum.evaluate(&b, &ctx, &mut scratch).unwrap(), 45.0);
        assert_eq!(Statistic::Median.evaluate(&b, &ctx, &mut scratch).unwrap(), 5.0);
        // Directional opening needs 5x5 windows
        assert!(Statistic::Morph.evaluate(&b, &ctx, &mut scratch).is_err());
    }
}
