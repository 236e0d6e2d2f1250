//! Hole and circle filling for binary edge masks
//!
//! Both passes mutate the mask in place while scanning in row-major order,
//! so a cell filled early in the scan is visible to every later window.

use crate::{MorphError, MorphResult};
use focal_core::ByteRaster;
use log::debug;

/// Fraction of a circle pattern that must already be set before it is stamped
pub const CIRCLE_MATCH_FRACTION: f32 = 0.3;

/// Neighbor test used by [`fill_holes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoleNeighbors {
    /// All four cross neighbors (up, left, right, down) must be set
    #[default]
    Cross,
    /// Two passes over opposing pairs: up/down first, then left/right
    Pairs,
}

const CROSS: [(i32, i32); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
const VERTICAL_PAIR: [(i32, i32); 2] = [(-1, 0), (1, 0)];
const HORIZONTAL_PAIR: [(i32, i32); 2] = [(0, -1), (0, 1)];

impl HoleNeighbors {
    /// Map a neighbor count (4 or 2) to a test
    ///
    /// # Errors
    ///
    /// Returns `MorphError::InvalidParameters` for any other count.
    pub fn from_count(count: usize) -> MorphResult<Self> {
        match count {
            4 => Ok(Self::Cross),
            2 => Ok(Self::Pairs),
            _ => Err(MorphError::InvalidParameters(format!(
                "neighbor count must be 4 or 2, got {count}"
            ))),
        }
    }

    /// Number of neighbors that must be set in each pass
    pub fn count(self) -> usize {
        match self {
            Self::Cross => 4,
            Self::Pairs => 2,
        }
    }

    fn passes(self) -> &'static [&'static [(i32, i32)]] {
        match self {
            Self::Cross => &[&CROSS],
            Self::Pairs => &[&VERTICAL_PAIR, &HORIZONTAL_PAIR],
        }
    }
}

/// Fill isolated zero cells surrounded by set neighbors
///
/// Every cell whose `window_size` window fits inside the mask is visited.
/// A zero cell becomes 1 when the values at its neighbor offsets sum to
/// the neighbor count. Returns the number of cells filled.
///
/// # Errors
///
/// Returns an error if `window_size` is even or larger than the mask.
pub fn fill_holes(
    mask: &mut ByteRaster,
    window_size: usize,
    neighbors: HoleNeighbors,
) -> MorphResult<usize> {
    let half = mask.check_window_size(window_size)?.max(1);
    let (rows, cols) = mask.shape();
    let required = neighbors.count() as u32;
    let mut filled = 0;

    if rows <= 2 * half || cols <= 2 * half {
        return Ok(0);
    }

    for offsets in neighbors.passes() {
        for r in half..rows - half {
            for c in half..cols - half {
                if mask.get_unchecked(r, c) != 0 {
                    continue;
                }
                let sum: u32 = offsets
                    .iter()
                    .map(|&(dr, dc)| {
                        let (nr, nc) = ((r as i32 + dr) as usize, (c as i32 + dc) as usize);
                        u32::from(mask.get_unchecked(nr, nc))
                    })
                    .sum();
                if sum == required {
                    mask.set_unchecked(r, c, 1);
                    filled += 1;
                }
            }
        }
    }

    debug!("fill_holes: window {window_size}, {neighbors:?}, filled {filled}");
    Ok(filled)
}

/// Stamp circle patterns wherever the mask already covers enough of them
///
/// Each pattern is a square binary raster. For every position where the
/// pattern fits, the number of cells set in both mask and pattern is
/// counted; when it reaches [`CIRCLE_MATCH_FRACTION`] of the pattern's set
/// cells, every set pattern cell is written into the mask. Patterns are
/// applied one after another. Returns the number of stamps made.
///
/// # Errors
///
/// Returns `focal_core::Error::ShapeMismatch` (wrapped) for non-square
/// patterns and `MorphError::InvalidParameters` for patterns larger than
/// the mask.
pub fn fill_circles(mask: &mut ByteRaster, circles: &[ByteRaster]) -> MorphResult<usize> {
    let (rows, cols) = mask.shape();
    let mut stamps = 0;

    for circle in circles {
        let size = circle.rows();
        circle.check_shape((size, size))?;
        if size > rows || size > cols {
            return Err(MorphError::InvalidParameters(format!(
                "circle pattern {size}x{size} larger than mask {rows}x{cols}"
            )));
        }

        let footprint: Vec<(usize, usize)> = circle.positions_of(1);
        let required = footprint.len() as f32 * CIRCLE_MATCH_FRACTION;

        for r in 0..=rows - size {
            for c in 0..=cols - size {
                let overlap = footprint
                    .iter()
                    .filter(|&&(fr, fc)| mask.get_unchecked(r + fr, c + fc) == 1)
                    .count();
                if !footprint.is_empty() && overlap as f32 >= required {
                    for &(fr, fc) in &footprint {
                        mask.set_unchecked(r + fr, c + fc, 1);
                    }
                    stamps += 1;
                }
            }
        }
    }

    debug!("fill_circles: {} patterns, {stamps} stamps", circles.len());
    Ok(stamps)
}
