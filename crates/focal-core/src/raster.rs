//! Raster - dense 2-D sample grid
//!
//! `Raster<T>` is the container every focal operator reads and writes.
//! Continuous data (edge gradient magnitude, statistics output) uses
//! [`FRaster`], binary edge and endpoint masks use [`ByteRaster`].
//!
//! Pixels are addressed as `(row, col)`. A [`Window`] is a borrowed
//! rectangular view into a raster, addressed by its top-left offset.
//!
//! # Examples
//!
//! ```
//! use focal_core::FRaster;
//!
//! let mut raster = FRaster::new(5, 7).unwrap();
//! raster.set(2, 3, 1.5).unwrap();
//! assert_eq!(raster.get(2, 3).unwrap(), 1.5);
//!
//! let window = raster.centered_window(2, 3, 3).unwrap();
//! assert_eq!(window.center(), 1.5);
//! ```

use crate::error::{Error, Result};
use crate::line::LineBuffer;

/// Dense row-major raster
///
/// # Memory Layout
///
/// Data is stored in row-major order with no padding. The sample at
/// `(row, col)` is at index `row * cols + col`.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

/// Floating-point raster (EGM, statistics, orientation records)
pub type FRaster = Raster<f32>;

/// 8-bit raster (binary edge and endpoint masks)
pub type ByteRaster = Raster<u8>;

impl<T: Copy + Default> Raster<T> {
    /// Create a new raster with every sample set to `T::default()`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if `rows` or `cols` is 0.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::new_with_value(rows, cols, T::default())
    }
}

impl<T: Copy> Raster<T> {
    /// Create a new raster with every sample set to `value`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if `rows` or `cols` is 0.
    pub fn new_with_value(rows: usize, cols: usize, value: T) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimension { rows, cols });
        }
        Ok(Raster {
            rows,
            cols,
            data: vec![value; rows * cols],
        })
    }

    /// Create a raster from row-major data
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or the data length
    /// doesn't match `rows * cols`.
    pub fn from_data(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimension { rows, cols });
        }
        let expected = rows * cols;
        if data.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{} = {}",
                data.len(),
                rows,
                cols,
                expected
            )));
        }
        Ok(Raster { rows, cols, data })
    }

    /// Create a raster from nested rows
    ///
    /// # Errors
    ///
    /// Returns an error if there are no rows, or rows differ in length.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::ShapeMismatch {
                    expected: (index, cols),
                    actual: (index, row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_data(rows.len(), cols, data)
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shape as `(rows, cols)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row-major sample data
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consume the raster, returning its row-major data
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Get the sample at `(row, col)`
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if the coordinates are outside the raster.
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.check_index(row, col)?;
        Ok(self.data[row * self.cols + col])
    }

    /// Get the sample at `(row, col)` without a bounds check beyond slice indexing
    #[inline]
    pub fn get_unchecked(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    /// Set the sample at `(row, col)`
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if the coordinates are outside the raster.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.check_index(row, col)?;
        self.data[row * self.cols + col] = value;
        Ok(())
    }

    /// Set the sample at `(row, col)` without a bounds check beyond slice indexing
    #[inline]
    pub fn set_unchecked(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.cols + col] = value;
    }

    /// Borrow one row
    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Apply `f` to every sample, producing a raster of the same shape
    pub fn map<U, F: FnMut(T) -> U>(&self, f: F) -> Raster<U> {
        Raster {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Fail with `ShapeMismatch` unless this raster has shape `expected`
    pub fn check_shape(&self, expected: (usize, usize)) -> Result<()> {
        if self.shape() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                actual: self.shape(),
            });
        }
        Ok(())
    }

    /// Validate a focal window size against this raster and return the half-window
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` unless `window_size` is odd and no
    /// larger than the smaller raster dimension.
    pub fn check_window_size(&self, window_size: usize) -> Result<usize> {
        if window_size == 0 || window_size % 2 == 0 {
            return Err(Error::InvalidParameter(format!(
                "window size must be odd and positive, got {window_size}"
            )));
        }
        if window_size > self.rows.min(self.cols) {
            return Err(Error::InvalidParameter(format!(
                "window size {} exceeds raster {}x{}",
                window_size, self.rows, self.cols
            )));
        }
        Ok(window_size / 2)
    }

    /// Borrow a `rows x cols` view whose top-left corner is `(row0, col0)`
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if the view does not fit entirely
    /// inside the raster.
    pub fn window(
        &self,
        row0: usize,
        col0: usize,
        rows: usize,
        cols: usize,
    ) -> Result<Window<'_, T>> {
        if row0 + rows > self.rows {
            return Err(Error::IndexOutOfBounds {
                index: row0 + rows,
                len: self.rows + 1,
            });
        }
        if col0 + cols > self.cols {
            return Err(Error::IndexOutOfBounds {
                index: col0 + cols,
                len: self.cols + 1,
            });
        }
        Ok(Window {
            raster: self,
            row0,
            col0,
            rows,
            cols,
        })
    }

    /// Borrow the `size x size` view centered on `(row, col)`
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if the view would extend past the
    /// raster edge.
    pub fn centered_window(&self, row: usize, col: usize, size: usize) -> Result<Window<'_, T>> {
        let half = size / 2;
        if row < half || col < half {
            return Err(Error::IndexOutOfBounds {
                index: row.min(col),
                len: half,
            });
        }
        self.window(row - half, col - half, size, size)
    }

    /// Borrow a view clipped to the raster; used for partial edge tiles
    pub fn clipped_window(
        &self,
        row0: usize,
        col0: usize,
        rows: usize,
        cols: usize,
    ) -> Window<'_, T> {
        let row0 = row0.min(self.rows - 1);
        let col0 = col0.min(self.cols - 1);
        Window {
            raster: self,
            row0,
            col0,
            rows: rows.min(self.rows - row0),
            cols: cols.min(self.cols - col0),
        }
    }

    fn check_index(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows {
            return Err(Error::IndexOutOfBounds {
                index: row,
                len: self.rows,
            });
        }
        if col >= self.cols {
            return Err(Error::IndexOutOfBounds {
                index: col,
                len: self.cols,
            });
        }
        Ok(())
    }
}

impl<T: Copy + PartialEq> Raster<T> {
    /// Coordinates of every sample equal to `value`, in row-major order
    pub fn positions_of(&self, value: T) -> Vec<(usize, usize)> {
        self.data
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == value)
            .map(|(i, _)| (i / self.cols, i % self.cols))
            .collect()
    }
}

impl FRaster {
    /// Convert to an 8-bit raster, saturating out-of-range values
    pub fn to_bytes(&self) -> ByteRaster {
        self.map(|v| v as u8)
    }
}

impl ByteRaster {
    /// Convert to a floating-point raster
    pub fn to_float(&self) -> FRaster {
        self.map(f32::from)
    }
}

/// Borrowed rectangular view into a [`Raster`]
///
/// Indices passed to [`Window::get`] are relative to the view's top-left
/// corner. Indexing outside the view panics.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a, T> {
    raster: &'a Raster<T>,
    row0: usize,
    col0: usize,
    rows: usize,
    cols: usize,
}

impl<'a, T: Copy> Window<'a, T> {
    /// Number of rows in the view
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in the view
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Top-left corner in raster coordinates
    #[inline]
    pub fn origin(&self) -> (usize, usize) {
        (self.row0, self.col0)
    }

    /// Number of samples in the view
    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// True if the view holds no samples
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample at view-relative `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` lies outside the view.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(row < self.rows && col < self.cols, "window index out of range");
        self.raster.get_unchecked(self.row0 + row, self.col0 + col)
    }

    /// Sample at the view's center cell
    #[inline]
    pub fn center(&self) -> T {
        self.get(self.rows / 2, self.cols / 2)
    }

    /// Iterate samples in row-major order
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.rows).flat_map(move |r| {
            let start = (self.row0 + r) * self.raster.cols() + self.col0;
            self.raster.data()[start..start + self.cols].iter().copied()
        })
    }

    /// Iterate `(row, col, value)` in row-major order with view-relative indices
    pub fn indexed(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.rows).flat_map(move |r| (0..self.cols).map(move |c| (r, c, self.get(r, c))))
    }

    /// Borrow a sub-view; coordinates are relative to this view
    ///
    /// Returns `None` if the sub-view does not fit.
    pub fn sub_window(
        &self,
        row0: usize,
        col0: usize,
        rows: usize,
        cols: usize,
    ) -> Option<Window<'a, T>> {
        if row0 + rows > self.rows || col0 + cols > self.cols {
            return None;
        }
        Some(Window {
            raster: self.raster,
            row0: self.row0 + row0,
            col0: self.col0 + col0,
            rows,
            cols,
        })
    }

    /// Borrow the `size x size` sub-view centered on view-relative `(row, col)`
    pub fn neighborhood(&self, row: usize, col: usize, size: usize) -> Option<Window<'a, T>> {
        let half = size / 2;
        if row < half || col < half {
            return None;
        }
        self.sub_window(row - half, col - half, size, size)
    }

    /// Sample the view along a view-relative line, replacing the contents of `out`
    ///
    /// # Panics
    ///
    /// Panics if any line coordinate is negative or outside the view.
    pub fn sample_line(&self, line: &LineBuffer, out: &mut Vec<T>) {
        out.clear();
        out.extend(line.iter().map(|(r, c)| self.get(r as usize, c as usize)));
    }

    /// Copy the view into an owned raster
    pub fn to_raster(&self) -> Raster<T> {
        Raster {
            rows: self.rows,
            cols: self.cols,
            data: self.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(rows: usize, cols: usize) -> FRaster {
        let data = (0..rows * cols).map(|i| i as f32).collect();
        FRaster::from_data(rows, cols, data).unwrap()
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(FRaster::new(0, 4).is_err());
        assert!(ByteRaster::new(3, 0).is_err());
    }

    #[test]
    fn test_get_set() {
        let mut r = FRaster::new(3, 4).unwrap();
        r.set(2, 3, 7.0).unwrap();
        assert_eq!(r.get(2, 3).unwrap(), 7.0);
        assert_eq!(r.data()[11], 7.0);
        assert!(r.get(3, 0).is_err());
        assert!(r.set(0, 4, 1.0).is_err());
    }

    #[test]
    fn test_from_rows() {
        let r = ByteRaster::from_rows(&[[1u8, 2, 3], [4, 5, 6]]).unwrap();
        assert_eq!(r.shape(), (2, 3));
        assert_eq!(r.get(1, 0).unwrap(), 4);
        let ragged: Vec<Vec<u8>> = vec![vec![1, 2], vec![3]];
        assert!(ByteRaster::from_rows(&ragged).is_err());
    }

    #[test]
    fn test_check_window_size() {
        let r = FRaster::new(5, 9).unwrap();
        assert_eq!(r.check_window_size(3).unwrap(), 1);
        assert_eq!(r.check_window_size(5).unwrap(), 2);
        assert!(r.check_window_size(4).is_err());
        assert!(r.check_window_size(7).is_err());
        assert!(r.check_window_size(0).is_err());
    }

    #[test]
    fn test_window_view() {
        let r = ramp(5, 5);
        let w = r.window(1, 2, 3, 2).unwrap();
        assert_eq!(w.get(0, 0), 7.0);
        assert_eq!(w.get(2, 1), 18.0);
        let values: Vec<f32> = w.iter().collect();
        assert_eq!(values, vec![7.0, 8.0, 12.0, 13.0, 17.0, 18.0]);
        assert!(r.window(3, 3, 3, 3).is_err());
    }

    #[test]
    fn test_centered_window() {
        let r = ramp(5, 5);
        let w = r.centered_window(2, 2, 5).unwrap();
        assert_eq!(w.center(), 12.0);
        assert_eq!(w.origin(), (0, 0));
        assert!(r.centered_window(1, 2, 5).is_err());
        let n = w.neighborhood(1, 1, 3).unwrap();
        assert_eq!(n.center(), 6.0);
        assert!(w.neighborhood(0, 1, 3).is_none());
    }

    #[test]
    fn test_clipped_window() {
        let r = ramp(5, 5);
        let w = r.clipped_window(3, 4, 3, 3);
        assert_eq!((w.rows(), w.cols()), (2, 1));
        assert_eq!(w.to_raster().into_data(), vec![19.0, 24.0]);
    }

    #[test]
    fn test_positions_of_row_major() {
        let r = ByteRaster::from_rows(&[[0u8, 1, 0], [1, 0, 1]]).unwrap();
        assert_eq!(r.positions_of(1), vec![(0, 1), (1, 0), (1, 2)]);
    }

    #[test]
    fn test_byte_float_conversion() {
        let f = FRaster::from_rows(&[[0.0f32, 1.7, 300.0, -4.0]]).unwrap();
        assert_eq!(f.to_bytes().into_data(), vec![0, 1, 255, 0]);
        let b = ByteRaster::from_rows(&[[3u8, 9]]).unwrap();
        assert_eq!(b.to_float().into_data(), vec![3.0, 9.0]);
    }
}
