//! focal-morph - Morphological post-processors for edge rasters
//!
//! This crate provides the binary clean-up passes applied to edge masks
//! after focal analysis:
//!
//! - Structuring elements ([`Sel`]) and grayscale erosion/dilation/opening
//! - Hole filling with cross or opposing-pair neighbor tests
//! - Circle filling from a list of binary circle patterns
//! - Directional opening: lowest-variance direction selection over 5x5
//!   windows, opened through a pluggable [`MorphOpen`] implementation

pub mod directional;
mod error;
pub mod fill;
pub mod gray;
pub mod sel;

pub use directional::{DIRECTION_COUNT, directional_open_center, direction_sel, select_direction};
pub use error::{MorphError, MorphResult};
pub use fill::{CIRCLE_MATCH_FRACTION, HoleNeighbors, fill_circles, fill_holes};
pub use gray::{GrayOpen, MorphOpen, dilate_gray, erode_gray, open_gray};
pub use sel::{Sel, SelElement};
