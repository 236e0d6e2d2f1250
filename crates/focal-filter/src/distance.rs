//! Spectral and color distance windows
//!
//! [`distance`] measures how strongly a pixel differs from its neighbors,
//! scaled by the local level. [`rgb_distance`] measures the mean color
//! distance between a pixel and its neighbors in a 3-band stack.

use crate::{FilterError, FilterResult};
use focal_core::{FRaster, RasterStack};
use log::debug;

/// Distance weights attenuating off-axis neighbors
///
/// Cells on the center row or column weigh 1; any other cell weighs
/// `max(|dr|, |dc|) / sqrt(dr^2 + dc^2)`, which is `1/sqrt(2)` on the
/// diagonals.
///
/// # Errors
///
/// Returns an error if `window_size` is 0.
pub fn default_distance_weights(window_size: usize) -> FilterResult<FRaster> {
    let half = (window_size / 2) as f32;
    let size = window_size;
    let data = (0..size * size)
        .map(|i| {
            let dr = ((i / size) as f32 - half).abs();
            let dc = ((i % size) as f32 - half).abs();
            if dr == 0.0 || dc == 0.0 {
                1.0
            } else {
                dr.max(dc) / (dr * dr + dc * dc).sqrt()
            }
        })
        .collect();
    Ok(FRaster::from_data(size, size, data)?)
}

/// Weighted spectral distance between each pixel and its neighbors
///
/// For center `c` and each non-center neighbor `n` that is not `no_data`:
/// `sdist += w(n) * (n - c)^2`, `wsum += w(n)`, `vsum += n`, `k += 1`,
/// with `vsum` starting at `c`. The output is `(sdist / wsum) * (vsum / k)`,
/// or 0 when the center is `no_data` or `sdist` is 0.
///
/// `weights` defaults to [`default_distance_weights`].
///
/// # Errors
///
/// Returns an error if the window size is invalid or `weights` does not
/// match it.
pub fn distance(
    raster: &FRaster,
    window_size: usize,
    no_data: Option<f32>,
    weights: Option<&FRaster>,
) -> FilterResult<FRaster> {
    let half = raster.check_window_size(window_size)?;
    let default_weights;
    let weights = match weights {
        Some(w) => {
            w.check_shape((window_size, window_size))?;
            w
        }
        None => {
            default_weights = default_distance_weights(window_size)?;
            &default_weights
        }
    };
    debug!(
        "distance: {}x{}, window {window_size}, no_data {no_data:?}",
        raster.rows(),
        raster.cols()
    );

    let (rows, cols) = raster.shape();
    let mut out = FRaster::new(rows, cols)?;
    let is_valid = |v: f32| no_data != Some(v);

    for r in 0..=rows - window_size {
        for c in 0..=cols - window_size {
            let block = raster.window(r, c, window_size, window_size)?;
            let center = block.get(half, half);
            if !is_valid(center) {
                continue;
            }

            let mut sdist = 0.0f32;
            let mut wsum = 0.0f32;
            let mut vsum = center;
            let mut good = 0usize;
            for (br, bc, v) in block.indexed() {
                if (br == half && bc == half) || !is_valid(v) {
                    continue;
                }
                let w = weights.get_unchecked(br, bc);
                sdist += (v - center) * (v - center) * w;
                wsum += w;
                vsum += v;
                good += 1;
            }

            if sdist != 0.0 && wsum != 0.0 {
                out.set_unchecked(r + half, c + half, (sdist / wsum) * (vsum / good as f32));
            }
        }
    }

    Ok(out)
}

/// Mean Euclidean RGB distance between each pixel and its neighbors
///
/// The first three bands of `stack` are read as red, green and blue.
///
/// # Errors
///
/// Returns `FilterError::InvalidParameters` if the stack has fewer than 3
/// bands, or an error if the window size is invalid.
pub fn rgb_distance(stack: &RasterStack, window_size: usize) -> FilterResult<FRaster> {
    if stack.band_count() < 3 {
        return Err(FilterError::InvalidParameters(format!(
            "rgb distance needs 3 bands, got {}",
            stack.band_count()
        )));
    }
    let (red, green, blue) = (stack.band(0)?, stack.band(1)?, stack.band(2)?);
    let half = red.check_window_size(window_size)?;
    let neighbors = (window_size * window_size - 1) as f32;
    debug!("rgb_distance: {}x{}, window {window_size}", red.rows(), red.cols());

    let (rows, cols) = red.shape();
    let mut out = FRaster::new(rows, cols)?;
    if neighbors == 0.0 {
        return Ok(out);
    }

    for r in half..rows - half {
        for c in half..cols - half {
            let center = (
                red.get_unchecked(r, c),
                green.get_unchecked(r, c),
                blue.get_unchecked(r, c),
            );
            let mut total = 0.0f32;
            for nr in r - half..=r + half {
                for nc in c - half..=c + half {
                    if nr == r && nc == c {
                        continue;
                    }
                    let dr = red.get_unchecked(nr, nc) - center.0;
                    let dg = green.get_unchecked(nr, nc) - center.1;
                    let db = blue.get_unchecked(nr, nc) - center.2;
                    total += (dr * dr + dg * dg + db * db).sqrt();
                }
            }
            out.set_unchecked(r, c, total / neighbors);
        }
    }

    Ok(out)
}
