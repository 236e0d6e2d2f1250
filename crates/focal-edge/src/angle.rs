//! Eight-direction angle codes for edge endpoints
//!
//! An endpoint's direction is read from its 3x3 neighborhood: the edge
//! pixels that are not themselves endpoints show where the line body
//! continues, and their position is mapped through [`ANGLE_TABLE`].

use focal_core::Window;

/// Angle code (degrees) for each cell of a 3x3 neighborhood
///
/// The center cell maps to 0 and is never a continuation on its own.
pub const ANGLE_TABLE: [[i16; 3]; 3] = [[-135, -90, -45], [-180, 0, 180], [45, 90, 135]];

/// Angle code of the line body around a 3x3 neighborhood center
///
/// Cells set in `edges` but clear in `endpoints` are collected in
/// row-major order. The first one sets the table index, each later one
/// is folded in with a progressive integer average. Returns `None` when
/// no cell qualifies.
///
/// # Panics
///
/// Panics if either view is smaller than 3x3.
pub fn local_orientation(edges: &Window<'_, u8>, endpoints: &Window<'_, u8>) -> Option<i16> {
    let mut hits = 0usize;
    let (mut row, mut col) = (0usize, 0usize);

    for r in 0..3 {
        for c in 0..3 {
            if edges.get(r, c) != 1 || endpoints.get(r, c) != 0 {
                continue;
            }
            if hits == 0 {
                (row, col) = (r, c);
            } else {
                row = (row + r) / (hits + 1);
                col = (col + c) / (hits + 1);
            }
            hits += 1;
        }
    }

    (hits > 0).then(|| ANGLE_TABLE[row][col])
}

/// Orientation of the endpoint at view-relative `(row, col)`
///
/// Returns `None` if the 3x3 neighborhood does not fit in the views or
/// no direction can be read from it.
pub fn endpoint_orientation(
    edges: &Window<'_, u8>,
    endpoints: &Window<'_, u8>,
    row: usize,
    col: usize,
) -> Option<i16> {
    let e = edges.neighborhood(row, col, 3)?;
    let p = endpoints.neighborhood(row, col, 3)?;
    local_orientation(&e, &p)
}
