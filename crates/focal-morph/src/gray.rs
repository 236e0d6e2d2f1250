//! Grayscale morphology with arbitrary structuring elements
//!
//! Erosion takes the minimum and dilation the maximum over the SEL hits.
//! Hits that fall outside the raster are skipped, so borders behave as if
//! padded with the neutral value of each operation.
//!
//! [`MorphOpen`] is the seam used by the directional-opening statistic;
//! [`GrayOpen`] is its default implementation.

use crate::{MorphError, MorphResult, Sel};
use focal_core::ByteRaster;

/// Morphological opening of an 8-bit raster with a structuring element
pub trait MorphOpen {
    /// Open `image` with `sel`, returning a raster of the same shape
    fn open(&self, image: &ByteRaster, sel: &Sel) -> MorphResult<ByteRaster>;
}

/// Opening built from [`erode_gray`] followed by [`dilate_gray`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GrayOpen;

impl MorphOpen for GrayOpen {
    fn open(&self, image: &ByteRaster, sel: &Sel) -> MorphResult<ByteRaster> {
        open_gray(image, sel)
    }
}

fn check_sel(sel: &Sel) -> MorphResult<()> {
    if sel.hit_count() == 0 {
        return Err(MorphError::InvalidSel("structuring element has no hits".into()));
    }
    Ok(())
}

/// Combine `image` values under every hit offset (scaled by `sign`) with `pick`
fn rank_gray(
    image: &ByteRaster,
    sel: &Sel,
    sign: i32,
    init: u8,
    pick: fn(u8, u8) -> u8,
) -> ByteRaster {
    let (rows, cols) = (image.rows() as i32, image.cols() as i32);
    let offsets: Vec<(i32, i32)> = sel.hit_offsets().collect();
    let mut out = image.clone();

    for r in 0..rows {
        for c in 0..cols {
            let mut acc = init;
            for &(dr, dc) in &offsets {
                let (sr, sc) = (r + sign * dr, c + sign * dc);
                if sr >= 0 && sr < rows && sc >= 0 && sc < cols {
                    acc = pick(acc, image.get_unchecked(sr as usize, sc as usize));
                }
            }
            out.set_unchecked(r as usize, c as usize, acc);
        }
    }
    out
}

/// Erode a grayscale raster: minimum over `image[p + h]` for each hit `h`
///
/// # Errors
///
/// Returns `MorphError::InvalidSel` if `sel` has no hits.
pub fn erode_gray(image: &ByteRaster, sel: &Sel) -> MorphResult<ByteRaster> {
    check_sel(sel)?;
    Ok(rank_gray(image, sel, 1, u8::MAX, u8::min))
}

/// Dilate a grayscale raster: maximum over `image[p - h]` for each hit `h`
///
/// # Errors
///
/// Returns `MorphError::InvalidSel` if `sel` has no hits.
pub fn dilate_gray(image: &ByteRaster, sel: &Sel) -> MorphResult<ByteRaster> {
    check_sel(sel)?;
    Ok(rank_gray(image, sel, -1, u8::MIN, u8::max))
}

/// Open a grayscale raster (erosion followed by dilation)
///
/// Opening removes bright features that the structuring element cannot fit
/// inside while preserving the overall shape.
pub fn open_gray(image: &ByteRaster, sel: &Sel) -> MorphResult<ByteRaster> {
    let eroded = erode_gray(image, sel)?;
    dilate_gray(&eroded, sel)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal3() -> Sel {
        Sel::from_points(1, 3, &[(0, 0), (0, 1), (0, 2)]).unwrap()
    }

    #[test]
    fn test_erode_dilate_horizontal() {
        let image = ByteRaster::from_rows(&[[0u8, 5, 5, 5, 0, 9, 0]]).unwrap();
        let sel = horizontal3();
        let eroded = erode_gray(&image, &sel).unwrap();
        assert_eq!(eroded.data(), &[0, 0, 5, 0, 0, 0, 0]);
        let dilated = dilate_gray(&image, &sel).unwrap();
        assert_eq!(dilated.data(), &[5, 5, 5, 5, 9, 9, 9]);
    }

    #[test]
    fn test_open_removes_thin_peak() {
        // The 3-wide plateau survives, the single-pixel spike does not
        let image = ByteRaster::from_rows(&[[0u8, 5, 5, 5, 0, 9, 0]]).unwrap();
        let opened = open_gray(&image, &horizontal3()).unwrap();
        assert_eq!(opened.data(), &[0, 5, 5, 5, 0, 0, 0]);
    }

    #[test]
    fn test_empty_sel_rejected() {
        let image = ByteRaster::new(3, 3).unwrap();
        let sel = Sel::new(3, 3).unwrap();
        assert!(erode_gray(&image, &sel).is_err());
        assert!(GrayOpen.open(&image, &sel).is_err());
    }
}
