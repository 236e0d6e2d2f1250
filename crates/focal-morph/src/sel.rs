//! Structuring Element (SEL) for morphological operations
//!
//! A structuring element defines the neighborhood used in morphological
//! operations. Offsets are reported as `(d_row, d_col)` relative to the
//! origin cell.

use crate::{MorphError, MorphResult};

/// Element type in a structuring element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SelElement {
    /// Don't care - this position is ignored
    #[default]
    DontCare = 0,
    /// Hit - this position belongs to the neighborhood
    Hit = 1,
}

/// Structuring Element (SEL)
///
/// The origin defaults to the center cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sel {
    rows: usize,
    cols: usize,
    origin: (usize, usize),
    data: Vec<SelElement>,
}

impl Sel {
    /// Create a new empty structuring element with a centered origin
    ///
    /// # Errors
    ///
    /// Returns `MorphError::InvalidSel` if either dimension is 0.
    pub fn new(rows: usize, cols: usize) -> MorphResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(MorphError::InvalidSel(format!(
                "dimensions must be non-zero, got {rows}x{cols}"
            )));
        }
        Ok(Sel {
            rows,
            cols,
            origin: (rows / 2, cols / 2),
            data: vec![SelElement::DontCare; rows * cols],
        })
    }

    /// Create a structuring element with hits at the listed cells
    ///
    /// # Errors
    ///
    /// Returns `MorphError::InvalidSel` if a cell is outside the element.
    pub fn from_points(rows: usize, cols: usize, points: &[(usize, usize)]) -> MorphResult<Self> {
        let mut sel = Self::new(rows, cols)?;
        for &(r, c) in points {
            if r >= rows || c >= cols {
                return Err(MorphError::InvalidSel(format!(
                    "point ({r}, {c}) outside {rows}x{cols} element"
                )));
            }
            sel.set_element(r, c, SelElement::Hit);
        }
        Ok(sel)
    }

    /// Set an element at `(row, col)`; out-of-range positions are ignored
    #[inline]
    pub fn set_element(&mut self, row: usize, col: usize, elem: SelElement) {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col] = elem;
        }
    }

    /// Count the number of hit elements
    pub fn hit_count(&self) -> usize {
        self.data.iter().filter(|&&e| e == SelElement::Hit).count()
    }

    /// Iterate over hit positions relative to the origin
    pub fn hit_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (or, oc) = (self.origin.0 as i32, self.origin.1 as i32);
        let cols = self.cols;

        self.data.iter().enumerate().filter_map(move |(idx, &elem)| {
            if elem == SelElement::Hit {
                let r = (idx / cols) as i32;
                let c = (idx % cols) as i32;
                Some((r - or, c - oc))
            } else {
                None
            }
        })
    }
}
