//! Line rasterization
//!
//! Integer Bresenham line generation and the direction query used by the
//! orientation operators. Lines are written into a reusable [`LineBuffer`]
//! so that the per-pixel search loops do not allocate.
//!
//! # See also
//!
//! Coordinates are stored as separate row/column arrays, the same
//! structure-of-arrays layout used for point arrays elsewhere.

/// Reusable buffer of `(row, col)` line coordinates
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    rows: Vec<i32>,
    cols: Vec<i32>,
}

impl LineBuffer {
    /// Create an empty buffer with room for `capacity` coordinates
    pub fn with_capacity(capacity: usize) -> Self {
        LineBuffer {
            rows: Vec::with_capacity(capacity),
            cols: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer large enough for any line inside a `window_size` window
    pub fn for_window(window_size: usize) -> Self {
        Self::with_capacity(window_size * 2)
    }

    /// Remove all coordinates, keeping the allocation
    #[inline]
    pub fn clear(&mut self) {
        self.rows.clear();
        self.cols.clear();
    }

    /// Append a coordinate
    #[inline]
    pub fn push(&mut self, row: i32, col: i32) {
        self.rows.push(row);
        self.cols.push(col);
    }

    /// Number of coordinates
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the buffer holds no coordinates
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Coordinate at `index`
    pub fn get(&self, index: usize) -> Option<(i32, i32)> {
        Some((*self.rows.get(index)?, *self.cols.get(index)?))
    }

    /// First coordinate (the line start)
    pub fn first(&self) -> Option<(i32, i32)> {
        self.get(0)
    }

    /// Last coordinate (the line end)
    pub fn last(&self) -> Option<(i32, i32)> {
        self.get(self.len().checked_sub(1)?)
    }

    /// Row coordinates
    pub fn rows(&self) -> &[i32] {
        &self.rows
    }

    /// Column coordinates
    pub fn cols(&self) -> &[i32] {
        &self.cols
    }

    /// Iterate `(row, col)` pairs from start to end
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().copied().zip(self.cols.iter().copied())
    }
}

/// Rasterize the segment `(r0, c0) -> (r1, c1)` into `buf`
///
/// Uses the integer decision-variable form of Bresenham's algorithm: the
/// dominant axis is walked one cell at a time and the minor axis steps
/// whenever the error term becomes non-negative. The last cell is always
/// exactly `(r1, c1)`, and the line holds `max(|dr|, |dc|) + 1` cells.
pub fn rasterize_into(buf: &mut LineBuffer, r0: i32, c0: i32, r1: i32, c1: i32) {
    buf.clear();

    let (mut minor, mut major) = (r0, c0);
    let (mut d_minor, mut d_major) = ((r1 - r0).abs(), (c1 - c0).abs());
    let (mut s_minor, mut s_major) = (
        if r1 - r0 > 0 { 1 } else { -1 },
        if c1 - c0 > 0 { 1 } else { -1 },
    );

    let steep = d_minor > d_major;
    if steep {
        std::mem::swap(&mut minor, &mut major);
        std::mem::swap(&mut d_minor, &mut d_major);
        std::mem::swap(&mut s_minor, &mut s_major);
    }

    let mut d = 2 * d_minor - d_major;
    for _ in 0..d_major {
        if steep {
            buf.push(major, minor);
        } else {
            buf.push(minor, major);
        }
        while d >= 0 {
            minor += s_minor;
            d -= 2 * d_major;
        }
        major += s_major;
        d += 2 * d_minor;
    }
    buf.push(r1, c1);
}

/// Rasterize the segment `(r0, c0) -> (r1, c1)` into a new buffer
///
/// # Examples
///
/// ```
/// use focal_core::line::rasterize;
///
/// let line = rasterize(0, 0, 0, 5);
/// assert_eq!(line.len(), 6);
/// assert_eq!(line.last(), Some((0, 5)));
/// ```
pub fn rasterize(r0: i32, c0: i32, r1: i32, c1: i32) -> LineBuffer {
    let n = (r1 - r0).abs().max((c1 - c0).abs()) as usize + 1;
    let mut buf = LineBuffer::with_capacity(n);
    rasterize_into(&mut buf, r0, c0, r1, c1);
    buf
}

/// Direction in radians of the line `start -> end` inside a `window_size` window
///
/// An end point below the start row is first reflected through the window
/// center, so every returned angle lies in `[0, PI]`, measured
/// counter-clockwise from the positive column axis with rows growing
/// downwards.
pub fn line_angle(start: (i32, i32), end: (i32, i32), window_size: usize) -> f32 {
    let span = window_size as i32 - 1;
    let (mut end_row, mut end_col) = end;
    if end_row > start.0 {
        end_row = (span - end_row).abs();
        end_col = (span - end_col).abs();
    }
    let col_diff = (end_col - start.1) as f32;
    let row_diff = (start.0 - end_row) as f32;
    row_diff.atan2(col_diff)
}
