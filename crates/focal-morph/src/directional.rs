//! Directional morphological opening
//!
//! A 5x5 window is probed along eight fixed 5-pixel directions through its
//! center. The direction whose samples have the lowest standard deviation
//! is taken as the local structure direction, its pixels become the
//! structuring element, and the window is opened with it. The statistic
//! value is the opened center sample.
//!
//! # See also
//!
//! Chaudhuri, Kushwaha and Samal (2012), directional morphological
//! enhancement for road detection.

use crate::{MorphError, MorphOpen, MorphResult, Sel};
use focal_core::{FRaster, Window};

/// Side length of the directional windows
pub const DIRECTION_WINDOW: usize = 5;

/// Number of probed directions
pub const DIRECTION_COUNT: usize = 8;

/// Cells of each direction inside a 5x5 window, as `(row, col)`
const DIRECTIONS: [[(usize, usize); 5]; DIRECTION_COUNT] = [
    [(2, 0), (2, 1), (2, 2), (2, 3), (2, 4)],
    [(3, 0), (3, 1), (2, 2), (1, 3), (1, 4)],
    [(4, 0), (3, 1), (2, 2), (1, 3), (0, 4)],
    [(4, 1), (3, 1), (2, 2), (1, 3), (0, 3)],
    [(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)],
    [(0, 1), (1, 1), (2, 2), (3, 3), (4, 3)],
    [(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)],
    [(1, 0), (1, 1), (2, 2), (3, 3), (3, 4)],
];

/// Structuring element for direction `index`
///
/// # Errors
///
/// Returns `MorphError::InvalidParameters` if `index >= DIRECTION_COUNT`.
pub fn direction_sel(index: usize) -> MorphResult<Sel> {
    let cells = DIRECTIONS.get(index).ok_or_else(|| {
        MorphError::InvalidParameters(format!("direction index {index} out of range"))
    })?;
    Sel::from_points(DIRECTION_WINDOW, DIRECTION_WINDOW, cells)
}

fn std_dev(values: &[f32; 5]) -> f32 {
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n;
    var.sqrt()
}

/// Index of the direction with the lowest sample standard deviation
///
/// Ties go to the lower index.
///
/// # Errors
///
/// Returns `MorphError::InvalidParameters` unless the window is 5x5.
pub fn select_direction(block: &Window<'_, f32>) -> MorphResult<usize> {
    if block.rows() != DIRECTION_WINDOW || block.cols() != DIRECTION_WINDOW {
        return Err(MorphError::InvalidParameters(format!(
            "directional selection needs a {0}x{0} window, got {1}x{2}",
            DIRECTION_WINDOW,
            block.rows(),
            block.cols()
        )));
    }

    let mut best = 0;
    let mut best_std = f32::INFINITY;
    for (index, cells) in DIRECTIONS.iter().enumerate() {
        let samples = cells.map(|(r, c)| block.get(r, c));
        let s = std_dev(&samples);
        if s < best_std {
            best_std = s;
            best = index;
        }
    }
    Ok(best)
}

/// Open a 5x5 window along its lowest-variance direction and return the center
///
/// Window samples are truncated to 8 bits before opening.
pub fn directional_open_center(
    block: &Window<'_, f32>,
    opener: &dyn MorphOpen,
) -> MorphResult<f32> {
    let direction = select_direction(block)?;
    let sel = direction_sel(direction)?;
    let image: FRaster = block.to_raster();
    let opened = opener.open(&image.to_bytes(), &sel)?;
    let half = DIRECTION_WINDOW / 2;
    Ok(f32::from(opened.get(half, half)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GrayOpen;

    #[test]
    fn test_direction_sels_pass_through_center() {
        for index in 0..DIRECTION_COUNT {
            let sel = direction_sel(index).unwrap();
            assert_eq!(sel.hit_count(), 5);
            assert!(sel.hit_offsets().any(|o| o == (0, 0)));
            // Every direction is point-symmetric about the center
            let offsets: Vec<_> = sel.hit_offsets().collect();
            assert!(offsets.iter().all(|&(r, c)| offsets.contains(&(-r, -c))));
        }
        assert!(direction_sel(DIRECTION_COUNT).is_err());
    }

    #[test]
    fn test_select_vertical_structure() {
        // Constant column through the center, noisy elsewhere
        let mut raster = FRaster::new(5, 5).unwrap();
        for r in 0..5 {
            for c in 0..5 {
                let v = if c == 2 { 100.0 } else { ((r * 5 + c) * 37 % 50) as f32 };
                raster.set(r, c, v).unwrap();
            }
        }
        let block = raster.window(0, 0, 5, 5).unwrap();
        assert_eq!(select_direction(&block).unwrap(), 4);
    }

    #[test]
    fn test_open_keeps_line_center() {
        let mut raster = FRaster::new(5, 5).unwrap();
        for c in 0..5 {
            raster.set(2, c, 200.0).unwrap();
        }
        let block = raster.window(0, 0, 5, 5).unwrap();
        let center = directional_open_center(&block, &GrayOpen).unwrap();
        assert_eq!(center, 200.0);
    }

    #[test]
    fn test_open_removes_isolated_peak() {
        let mut raster = FRaster::new(5, 5).unwrap();
        raster.set(2, 2, 200.0).unwrap();
        let block = raster.window(0, 0, 5, 5).unwrap();
        assert_eq!(directional_open_center(&block, &GrayOpen).unwrap(), 0.0);
    }

    #[test]
    fn test_rejects_other_sizes() {
        let raster = FRaster::new(3, 3).unwrap();
        let block = raster.window(0, 0, 3, 3).unwrap();
        assert!(select_direction(&block).is_err());
    }
}
