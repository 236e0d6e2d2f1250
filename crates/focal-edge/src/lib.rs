//! focal-edge - Edge structure operators
//!
//! This crate works on edge rasters produced upstream:
//!
//! - [`angle`]: the eight-direction angle table and endpoint orientation
//! - [`link`]: endpoint linking, bridging gaps between line ends with
//!   length-tiered acceptance rules and directional closures
//! - [`saliency`]: optimal orientation, linearity and saliency of EGM
//!   rasters
//!
//! # Examples
//!
//! ```
//! use focal_core::ByteRaster;
//! use focal_edge::{LinkOptions, link_endpoints};
//!
//! let mut edges = ByteRaster::new(15, 15).unwrap();
//! let mut endpoints = ByteRaster::new(15, 15).unwrap();
//! let egm = ByteRaster::new(15, 15).unwrap();
//! let options = LinkOptions::default();
//! let summary = link_endpoints(&mut edges, &mut endpoints, &egm, &options).unwrap();
//! assert_eq!(summary.links, 0);
//! ```

pub mod angle;
mod error;
pub mod link;
pub mod saliency;

pub use angle::{ANGLE_TABLE, endpoint_orientation, local_orientation};
pub use error::{EdgeError, EdgeResult};
pub use link::{LinkOptions, LinkSummary, link_endpoints};
pub use saliency::{Orientation, SaliencyOptions, saliency};
