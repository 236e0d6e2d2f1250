//! Single routing entry for every focal operation
//!
//! [`apply`] takes a band stack, an [`Operation`] and one [`ApplyParams`]
//! carrying the union of every operator's parameters, validates the
//! inputs the operation depends on, and forwards to the matching crate.
//! Every operation returns a stack: one band for most operations, two for
//! `link` (`[edges, endpoints]`) and `saliency` (`[linearity, saliency]`).
//!
//! Operations that read a single raster use band `value_position` of the
//! input. Binary operations (`link`, `fill`, `circles`) read that band as
//! an 8-bit mask.

use crate::{FocalError, FocalResult};
use focal_core::{ByteRaster, FRaster, RasterStack, from_sentinel};
use focal_edge::{LinkOptions, SaliencyOptions, link_endpoints, saliency};
use focal_filter::inhibition::DEFAULT_INHIBITION_SCALES;
use focal_filter::{
    InhibitionOptions, Statistic, WindowOptions, distance, evaluate, inhibit, rgb_distance,
};
use focal_morph::{HoleNeighbors, fill_circles, fill_holes};
use log::debug;
use std::fmt;
use std::str::FromStr;

/// Operation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Mean,
    Min,
    Max,
    Median,
    Majority,
    Percent,
    Sum,
    /// Endpoint linking
    Link,
    /// Hole filling
    Fill,
    /// Circle filling
    Circles,
    /// Weighted spectral distance
    Distance,
    /// Mean RGB distance over the first three bands
    RgbDistance,
    /// Surround inhibition
    Inhibition,
    /// Linearity and saliency
    Saliency,
    /// Duda contrast
    Duda,
}

impl Operation {
    /// All operations, in declaration order
    pub const ALL: [Operation; 15] = [
        Operation::Mean,
        Operation::Min,
        Operation::Max,
        Operation::Median,
        Operation::Majority,
        Operation::Percent,
        Operation::Sum,
        Operation::Link,
        Operation::Fill,
        Operation::Circles,
        Operation::Distance,
        Operation::RgbDistance,
        Operation::Inhibition,
        Operation::Saliency,
        Operation::Duda,
    ];

    /// Lower-case name
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Mean => "mean",
            Operation::Min => "min",
            Operation::Max => "max",
            Operation::Median => "median",
            Operation::Majority => "majority",
            Operation::Percent => "percent",
            Operation::Sum => "sum",
            Operation::Link => "link",
            Operation::Fill => "fill",
            Operation::Circles => "circles",
            Operation::Distance => "distance",
            Operation::RgbDistance => "rgb_distance",
            Operation::Inhibition => "inhibition",
            Operation::Saliency => "saliency",
            Operation::Duda => "duda",
        }
    }

    /// The window statistic this operation evaluates, if it is one
    pub fn statistic(self) -> Option<Statistic> {
        match self {
            Operation::Mean => Some(Statistic::Mean),
            Operation::Min => Some(Statistic::Min),
            Operation::Max => Some(Statistic::Max),
            Operation::Median => Some(Statistic::Median),
            Operation::Majority => Some(Statistic::Majority),
            Operation::Percent => Some(Statistic::Percent),
            Operation::Sum => Some(Statistic::Sum),
            Operation::Duda => Some(Statistic::Duda),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = FocalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| FocalError::UnsupportedOperation(s.to_string()))
    }
}

/// Parameters for [`apply`]
///
/// Each operation reads only the fields it needs.
#[derive(Debug, Clone)]
pub struct ApplyParams {
    /// Odd window size
    pub window_size: usize,
    /// Decimation tile size for statistics; 0 slides
    pub skip_block: usize,
    /// Statistics only evaluate windows centered on this value
    pub target_value: Option<f32>,
    /// Excluded from statistics; the no-data value for `distance`
    pub ignore_value: Option<f32>,
    /// Statistic passes
    pub iterations: usize,
    /// Weight kernel for `mean` and `distance`
    pub weights: Option<FRaster>,
    /// Endpoint mask for `link`
    pub endpoints: Option<ByteRaster>,
    /// 8-bit EGM for `link`
    pub gradient: Option<ByteRaster>,
    /// Hole fill neighbor count, 4 or 2
    pub neighbor_count: usize,
    /// Square circle patterns for `circles`
    pub circles: Vec<ByteRaster>,
    /// Minimum mean EGM for `link`
    pub min_egm: f32,
    /// Small gap limit for `link`
    pub small_gap: usize,
    /// Medium gap limit for `link`
    pub medium_gap: usize,
    /// Inhibition levels
    pub inhibition_scales: Vec<f32>,
    /// Input band read by single-raster operations
    pub value_position: usize,
}

impl Default for ApplyParams {
    fn default() -> Self {
        let link = LinkOptions::default();
        Self {
            window_size: focal_filter::window::DEFAULT_WINDOW_SIZE,
            skip_block: 0,
            target_value: None,
            ignore_value: None,
            iterations: focal_filter::window::DEFAULT_ITERATIONS,
            weights: None,
            endpoints: None,
            gradient: None,
            neighbor_count: HoleNeighbors::default().count(),
            circles: Vec::new(),
            min_egm: link.min_egm,
            small_gap: link.small_gap,
            medium_gap: link.medium_gap,
            inhibition_scales: DEFAULT_INHIBITION_SCALES.to_vec(),
            value_position: 0,
        }
    }
}

impl ApplyParams {
    /// Set the window size
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the decimation tile size
    pub fn with_skip_block(mut self, skip_block: usize) -> Self {
        self.skip_block = skip_block;
        self
    }

    /// Set the target value; [`focal_core::SENTINEL`] clears it
    pub fn with_target_value(mut self, value: f32) -> Self {
        self.target_value = from_sentinel(value);
        self
    }

    /// Set the ignore value; [`focal_core::SENTINEL`] clears it
    pub fn with_ignore_value(mut self, value: f32) -> Self {
        self.ignore_value = from_sentinel(value);
        self
    }

    /// Set the number of statistic passes
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the weight kernel
    pub fn with_weights(mut self, weights: FRaster) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Set the endpoint mask and gradient used by `link`
    pub fn with_link_inputs(mut self, endpoints: ByteRaster, gradient: ByteRaster) -> Self {
        self.endpoints = Some(endpoints);
        self.gradient = Some(gradient);
        self
    }

    /// Set the hole fill neighbor count
    pub fn with_neighbor_count(mut self, count: usize) -> Self {
        self.neighbor_count = count;
        self
    }

    /// Set the circle patterns
    pub fn with_circles(mut self, circles: Vec<ByteRaster>) -> Self {
        self.circles = circles;
        self
    }

    /// Set the linking thresholds
    pub fn with_link_limits(mut self, min_egm: f32, small_gap: usize, medium_gap: usize) -> Self {
        self.min_egm = min_egm;
        self.small_gap = small_gap;
        self.medium_gap = medium_gap;
        self
    }

    /// Set the inhibition levels
    pub fn with_inhibition_scales(mut self, scales: Vec<f32>) -> Self {
        self.inhibition_scales = scales;
        self
    }

    /// Set the input band for single-raster operations
    pub fn with_value_position(mut self, value_position: usize) -> Self {
        self.value_position = value_position;
        self
    }

    fn window_options(&self) -> WindowOptions {
        WindowOptions {
            window_size: self.window_size,
            skip_block: self.skip_block,
            target_value: self.target_value,
            ignore_value: self.ignore_value,
            iterations: self.iterations,
            weights: self.weights.clone(),
        }
    }

    /// Check every auxiliary raster the operation reads against the input
    fn validate(&self, operation: Operation, shape: (usize, usize)) -> FocalResult<()> {
        if let Some(weights) = &self.weights {
            let k = match operation.statistic() {
                Some(_) if self.skip_block > 0 => self.skip_block,
                _ => self.window_size,
            };
            weights.check_shape((k, k))?;
        }
        if let Some(endpoints) = &self.endpoints {
            endpoints.check_shape(shape)?;
        }
        if let Some(gradient) = &self.gradient {
            gradient.check_shape(shape)?;
        }
        match operation {
            Operation::Link => {
                if self.endpoints.is_none() {
                    return Err(FocalError::MissingInput("link needs an endpoint mask"));
                }
                if self.gradient.is_none() {
                    return Err(FocalError::MissingInput("link needs a gradient raster"));
                }
            }
            Operation::Circles => {
                for circle in &self.circles {
                    circle.check_shape((self.window_size, self.window_size))?;
                }
            }
            Operation::Fill => {
                HoleNeighbors::from_count(self.neighbor_count)?;
            }
            _ => {}
        }
        Ok(())
    }
}

/// Run `operation` on `image`
///
/// All inputs are validated before any pixel is processed.
///
/// # Errors
///
/// Returns `ShapeMismatch` (wrapped) for weights, endpoint or gradient
/// rasters, or circle patterns that disagree with the window or image,
/// `MissingInput` when `link` lacks its endpoint or gradient raster, and
/// any error of the operator itself.
///
/// # Examples
///
/// ```
/// use focal::{ApplyParams, Operation, apply};
/// use focal_core::{FRaster, RasterStack};
///
/// let image = RasterStack::from(FRaster::new_with_value(5, 5, 3.0).unwrap());
/// let out = apply(&image, Operation::Mean, &ApplyParams::default()).unwrap();
/// assert_eq!(out.band(0).unwrap().get(2, 2).unwrap(), 3.0);
/// ```
pub fn apply(
    image: &RasterStack,
    operation: Operation,
    params: &ApplyParams,
) -> FocalResult<RasterStack> {
    params.validate(operation, image.shape())?;
    debug!(
        "apply: {operation} on {} band(s) {}x{}, window {}",
        image.band_count(),
        image.shape().0,
        image.shape().1,
        params.window_size
    );

    let out = match operation {
        Operation::Link => {
            let (Some(endpoints), Some(gradient)) = (&params.endpoints, &params.gradient) else {
                return Err(FocalError::MissingInput("link needs endpoint and gradient rasters"));
            };
            let mut edges = image.band(params.value_position)?.to_bytes();
            let mut endpoints = endpoints.clone();
            let options = LinkOptions::default()
                .with_window_size(params.window_size)
                .with_min_egm(params.min_egm)
                .with_small_gap(params.small_gap)
                .with_medium_gap(params.medium_gap);
            link_endpoints(&mut edges, &mut endpoints, gradient, &options)?;
            RasterStack::new(vec![edges.to_float(), endpoints.to_float()])?
        }
        Operation::Fill => {
            let mut mask = image.band(params.value_position)?.to_bytes();
            let neighbors = HoleNeighbors::from_count(params.neighbor_count)?;
            fill_holes(&mut mask, params.window_size, neighbors)?;
            RasterStack::from(mask.to_float())
        }
        Operation::Circles => {
            let mut mask = image.band(params.value_position)?.to_bytes();
            fill_circles(&mut mask, &params.circles)?;
            RasterStack::from(mask.to_float())
        }
        Operation::Distance => {
            let band = image.band(params.value_position)?;
            let weights = params.weights.as_ref();
            let out = distance(band, params.window_size, params.ignore_value, weights)?;
            RasterStack::from(out)
        }
        Operation::RgbDistance => RasterStack::from(rgb_distance(image, params.window_size)?),
        Operation::Inhibition => {
            let band = image.band(params.value_position)?;
            let options = InhibitionOptions::default()
                .with_window_size(params.window_size)
                .with_scales(params.inhibition_scales.clone());
            RasterStack::from(inhibit(band, &options)?)
        }
        Operation::Saliency => {
            let band = image.band(params.value_position)?;
            saliency(band, &SaliencyOptions::default().with_window_size(params.window_size))?
        }
        _ => {
            let statistic = operation
                .statistic()
                .ok_or_else(|| FocalError::UnsupportedOperation(operation.to_string()))?;
            let band = image.band(params.value_position)?;
            RasterStack::from(evaluate(band, statistic, &params.window_options())?)
        }
    };

    Ok(out)
}

/// Parse `name` and run the operation
///
/// # Errors
///
/// Returns `FocalError::UnsupportedOperation` for unknown names, before
/// any computation, and otherwise the errors of [`apply`].
pub fn apply_named(
    image: &RasterStack,
    name: &str,
    params: &ApplyParams,
) -> FocalResult<RasterStack> {
    let operation: Operation = name.parse()?;
    apply(image, operation, params)
}
