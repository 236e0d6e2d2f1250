//! Edge endpoint linking
//!
//! Bridges gaps in a binary edge mask. Every endpoint of the input mask
//! is visited once, in row-major order of a snapshot taken before any
//! change. For each endpoint the other endpoints of its window are tested
//! as partners, the shortest acceptable connecting line wins, and if none
//! is accepted a short directional closure toward the nearest edge pixel
//! is tried instead.
//!
//! Accepted links are written into the masks immediately, so endpoints
//! visited later see the updated masks. The result therefore depends on
//! the visiting order.
//!
//! # Acceptance tiers
//!
//! A candidate line is rejected outright if it is not shorter than the
//! best line found so far, crosses more than two edge pixels, or joins two
//! endpoints with the same (or an unreadable) direction. Otherwise:
//!
//! | line length          | accepted when                                     |
//! |----------------------|---------------------------------------------------|
//! | `<= small_gap`       | mean EGM along the line `> min_egm`               |
//! | `<= medium_gap`      | the angle pair is compatible for the octant       |
//! | longer               | angles are inverse and mean EGM `>= min_egm`      |

use crate::angle::endpoint_orientation;
use crate::EdgeResult;
use focal_core::{ByteRaster, LineBuffer, Window, rasterize_into};
use focal_filter::line_stats;
use log::debug;

/// Default linking window size
pub const DEFAULT_LINK_WINDOW: usize = 9;

/// Default minimum mean EGM along a connecting line
pub const DEFAULT_MIN_EGM: f32 = 25.0;

/// Default longest line accepted on EGM alone
pub const DEFAULT_SMALL_GAP: usize = 3;

/// Default longest line accepted on angle compatibility alone
pub const DEFAULT_MEDIUM_GAP: usize = 7;

/// Longest closure line accepted on EGM alone
const SHORT_CLOSURE: usize = 3;

/// Edge pixels required on the orthogonal through a closure target
const ORTHOGONAL_SUPPORT: u32 = 3;

/// Options for [`link_endpoints`]
#[derive(Debug, Clone)]
pub struct LinkOptions {
    /// Window size, odd
    ///
    /// Directional closures walk at most `window_size / 2 - 3` steps, so at
    /// the default of 9 a closure only reaches the pixel adjacent to the
    /// endpoint, and windows below 9 never close.
    pub window_size: usize,
    /// Minimum mean EGM along a connecting line
    pub min_egm: f32,
    /// Longest line accepted on EGM alone; capped at the window size
    pub small_gap: usize,
    /// Longest line accepted on angle compatibility; capped at the window size
    pub medium_gap: usize,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_LINK_WINDOW,
            min_egm: DEFAULT_MIN_EGM,
            small_gap: DEFAULT_SMALL_GAP,
            medium_gap: DEFAULT_MEDIUM_GAP,
        }
    }
}

impl LinkOptions {
    /// Set the window size
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the minimum mean EGM
    pub fn with_min_egm(mut self, min_egm: f32) -> Self {
        self.min_egm = min_egm;
        self
    }

    /// Set the small gap limit
    pub fn with_small_gap(mut self, small_gap: usize) -> Self {
        self.small_gap = small_gap;
        self
    }

    /// Set the medium gap limit
    pub fn with_medium_gap(mut self, medium_gap: usize) -> Self {
        self.medium_gap = medium_gap;
        self
    }
}

/// What a call to [`link_endpoints`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkSummary {
    /// Endpoints whose window fit inside the raster
    pub visited: usize,
    /// Endpoint-to-endpoint links
    pub links: usize,
    /// Directional closures toward an edge pixel
    pub closures: usize,
}

/// Position of a partner endpoint relative to the window center
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Octant {
    /// Northwest or southeast
    Diagonal,
    /// North or south
    Vertical,
    /// Northeast or southwest
    AntiDiagonal,
    /// East or west
    Horizontal,
}

// (center angle, partner angle) pairs accepted besides exact inverses
const DIAGONAL_PAIRS: [(i16, i16); 4] = [(180, -135), (90, -135), (-180, 135), (-90, 135)];
const VERTICAL_PAIRS: [(i16, i16); 4] = [(90, -135), (90, -45), (-90, 135), (-90, 45)];
const ANTI_DIAGONAL_PAIRS: [(i16, i16); 4] = [(-180, -45), (90, -45), (180, 45), (-90, 45)];
const HORIZONTAL_PAIRS: [(i16, i16); 4] = [(180, -135), (180, 45), (-180, 135), (-180, -45)];

impl Octant {
    /// Classify block cell `(row, col)`; cells within two of the center
    /// on either axis boundary belong to no octant
    fn classify(row: usize, col: usize, half: usize) -> Option<Self> {
        let (r, c, h) = (row as i64, col as i64, half as i64);
        let before = |v: i64| v < h - 2;
        let after = |v: i64| v > h + 2;
        let near = |v: i64| h - 2 < v && v < h + 2;

        if (before(r) && before(c)) || (after(r) && after(c)) {
            Some(Self::Diagonal)
        } else if (before(r) || after(r)) && near(c) {
            Some(Self::Vertical)
        } else if (before(r) && after(c)) || (after(r) && before(c)) {
            Some(Self::AntiDiagonal)
        } else if near(r) && (before(c) || after(c)) {
            Some(Self::Horizontal)
        } else {
            None
        }
    }

    fn compatible(self, center: i16, partner: i16) -> bool {
        let pairs = match self {
            Self::Diagonal => &DIAGONAL_PAIRS,
            Self::Vertical => &VERTICAL_PAIRS,
            Self::AntiDiagonal => &ANTI_DIAGONAL_PAIRS,
            Self::Horizontal => &HORIZONTAL_PAIRS,
        };
        center + partner == 0 || pairs.contains(&(center, partner))
    }
}

// Cells of a 5x5 block lying on the line orthogonal to a walk direction
const ORTHO_ROW: [(usize, usize); 5] = [(2, 0), (2, 1), (2, 2), (2, 3), (2, 4)];
const ORTHO_COL: [(usize, usize); 5] = [(0, 2), (1, 2), (2, 2), (3, 2), (4, 2)];
const ORTHO_ANTI: [(usize, usize); 5] = [(4, 0), (3, 1), (2, 2), (1, 3), (0, 4)];
const ORTHO_MAIN: [(usize, usize); 5] = [(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)];

/// Walk step away from the line body, and the orthogonal check pattern
fn closure_direction(angle: i16) -> Option<((i64, i64), &'static [(usize, usize); 5])> {
    match angle {
        90 => Some(((-1, 0), &ORTHO_ROW)),
        -90 => Some(((1, 0), &ORTHO_ROW)),
        180 => Some(((0, -1), &ORTHO_COL)),
        -180 => Some(((0, 1), &ORTHO_COL)),
        135 => Some(((-1, -1), &ORTHO_ANTI)),
        -135 => Some(((1, 1), &ORTHO_ANTI)),
        45 => Some(((-1, 1), &ORTHO_MAIN)),
        -45 => Some(((1, -1), &ORTHO_MAIN)),
        _ => None,
    }
}

/// Accepted connection; the line itself is left in `LinkScratch::best`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    /// Joined to the endpoint at this block cell
    Endpoint(usize, usize),
    /// Closed toward an edge pixel
    Closure,
}

/// Reusable buffers for values sampled along a line
struct LineSamples {
    bytes: Vec<u8>,
    values: Vec<f32>,
}

impl LineSamples {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Sample `raster` along `line` as floats
    fn along(&mut self, raster: &Window<'_, u8>, line: &LineBuffer) -> &[f32] {
        raster.sample_line(line, &mut self.bytes);
        self.values.clear();
        self.values.extend(self.bytes.iter().map(|&v| f32::from(v)));
        &self.values
    }
}

struct LinkScratch {
    line: LineBuffer,
    best: LineBuffer,
    samples: LineSamples,
}

impl LinkScratch {
    fn for_window(window_size: usize) -> Self {
        Self {
            line: LineBuffer::for_window(window_size),
            best: LineBuffer::for_window(window_size),
            samples: LineSamples::with_capacity(window_size * 2),
        }
    }
}

/// Link endpoints in place
///
/// `edges` and `endpoints` are binary masks (1 = set) and `egm` is the
/// 8-bit edge gradient magnitude, all of the same shape. Every accepted
/// connection is burned into `edges`, and the endpoints it consumes are
/// cleared from `endpoints`.
///
/// # Errors
///
/// Returns `ShapeMismatch` (wrapped) if the three rasters differ in shape,
/// or an error if the window size is even or larger than the rasters.
pub fn link_endpoints(
    edges: &mut ByteRaster,
    endpoints: &mut ByteRaster,
    egm: &ByteRaster,
    options: &LinkOptions,
) -> EdgeResult<LinkSummary> {
    let shape = edges.shape();
    endpoints.check_shape(shape)?;
    egm.check_shape(shape)?;
    let half = edges.check_window_size(options.window_size)?;
    let size = options.window_size;
    let (rows, cols) = shape;

    let snapshot = endpoints.positions_of(1);
    debug!(
        "link_endpoints: {} endpoints on {rows}x{cols}, window {size}, min_egm {}",
        snapshot.len(),
        options.min_egm
    );

    let mut scratch = LinkScratch::for_window(size);
    let mut summary = LinkSummary::default();

    for (r, c) in snapshot {
        if r < half || c < half || r + half >= rows || c + half >= cols {
            continue;
        }
        let (r0, c0) = (r - half, c - half);
        summary.visited += 1;

        let planned = {
            let e = edges.window(r0, c0, size, size)?;
            let p = endpoints.window(r0, c0, size, size)?;
            let g = egm.window(r0, c0, size, size)?;
            plan_link(&e, &p, &g, options, &mut scratch)
        };
        let Some(kind) = planned else {
            continue;
        };

        for (lr, lc) in scratch.best.iter() {
            edges.set_unchecked(r0 + lr as usize, c0 + lc as usize, 1);
        }
        endpoints.set_unchecked(r, c, 0);
        match kind {
            LinkKind::Endpoint(pr, pc) => {
                endpoints.set_unchecked(r0 + pr, c0 + pc, 0);
                summary.links += 1;
            }
            LinkKind::Closure => summary.closures += 1,
        }
    }

    debug!(
        "link_endpoints: visited {}, linked {}, closed {}",
        summary.visited, summary.links, summary.closures
    );
    Ok(summary)
}

/// Decide the connection for the endpoint at the center of the block
fn plan_link(
    edges: &Window<'_, u8>,
    endpoints: &Window<'_, u8>,
    egm: &Window<'_, u8>,
    options: &LinkOptions,
    scratch: &mut LinkScratch,
) -> Option<LinkKind> {
    let size = edges.rows();
    let half = size / 2;
    let center_angle = endpoint_orientation(edges, endpoints, half, half)?;

    let small_gap = options.small_gap.min(size);
    let medium_gap = options.medium_gap.min(size);
    let mut smallest = size * size;
    let mut partner = None;

    let endpoint_count: u32 = endpoints.iter().map(u32::from).sum();
    if endpoint_count > 1 {
        // Candidates need a full 3x3 neighborhood for their angle. Scanning
        // 1..=size - 2 lets the south and east sides reach one cell further
        // than a 0..size - 2 scan.
        for ii in 1..size - 1 {
            for jj in 1..size - 1 {
                if ii.abs_diff(half) <= 1 && jj.abs_diff(half) <= 1 {
                    continue;
                }
                if endpoints.get(ii, jj) != 1 {
                    continue;
                }

                rasterize_into(&mut scratch.line, half as i32, half as i32, ii as i32, jj as i32);
                let len = scratch.line.len();
                if len >= smallest {
                    continue;
                }
                if line_stats::sum(scratch.samples.along(edges, &scratch.line)) > 2.0 {
                    continue;
                }
                let Some(partner_angle) = endpoint_orientation(edges, endpoints, ii, jj) else {
                    continue;
                };
                if partner_angle == center_angle {
                    continue;
                }

                let accepted = if len <= small_gap {
                    let mean = line_stats::mean(scratch.samples.along(egm, &scratch.line));
                    mean > options.min_egm
                } else if len <= medium_gap {
                    Octant::classify(ii, jj, half)
                        .is_some_and(|o| o.compatible(center_angle, partner_angle))
                } else {
                    let mean = line_stats::mean(scratch.samples.along(egm, &scratch.line));
                    center_angle + partner_angle == 0 && mean >= options.min_egm
                };

                if accepted {
                    scratch.best.clone_from(&scratch.line);
                    partner = Some((ii, jj));
                    smallest = len;
                }
            }
        }
    }

    if let Some((pr, pc)) = partner {
        return Some(LinkKind::Endpoint(pr, pc));
    }
    close_gap(edges, endpoints, egm, center_angle, options.min_egm, scratch)
        .then_some(LinkKind::Closure)
}

/// Walk away from the line body looking for an edge pixel to close onto
///
/// Only the first edge pixel met is considered. The closure is accepted
/// when mean EGM along the line reaches `min_egm` and the line is short,
/// or the target's own direction is inverse to the center's, or the
/// target sits on an orthogonal run of edge pixels.
fn close_gap(
    edges: &Window<'_, u8>,
    endpoints: &Window<'_, u8>,
    egm: &Window<'_, u8>,
    center_angle: i16,
    min_egm: f32,
    scratch: &mut LinkScratch,
) -> bool {
    let Some(((dr, dc), orthogonal)) = closure_direction(center_angle) else {
        return false;
    };
    let half = edges.rows() / 2;

    for step in 1..half.saturating_sub(2) {
        let far_r = half as i64 + step as i64 * dr;
        let far_c = half as i64 + step as i64 * dc;
        let (fr, fc) = (far_r as usize, far_c as usize);
        if edges.get(fr, fc) != 1 {
            continue;
        }

        rasterize_into(&mut scratch.best, half as i32, half as i32, far_r as i32, far_c as i32);
        let mean = line_stats::mean(scratch.samples.along(egm, &scratch.best));
        if scratch.best.len() <= SHORT_CLOSURE && mean >= min_egm {
            return true;
        }

        let inverse =
            endpoint_orientation(edges, endpoints, fr, fc).is_some_and(|a| a + center_angle == 0);
        let support: u32 = edges
            .neighborhood(fr, fc, 5)
            .map_or(0, |b| orthogonal.iter().map(|&(r, c)| u32::from(b.get(r, c))).sum());
        return (inverse || support >= ORTHOGONAL_SUPPORT) && mean >= min_egm;
    }

    false
}
