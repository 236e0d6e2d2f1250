//! Reductions over samples taken along a rasterized line
//!
//! The edge operators sample a raster along Bresenham lines (see
//! `focal_core::Window::sample_line`) and reduce the samples with these
//! helpers.

/// Arithmetic mean, or 0 for an empty slice
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Sum of all samples
pub fn sum(values: &[f32]) -> f32 {
    values.iter().sum()
}

/// Sum and count of the leading samples strictly above `floor`
///
/// Accumulation stops at the first sample `<= floor`.
pub fn sum_while_above(values: &[f32], floor: f32) -> (f32, usize) {
    values
        .iter()
        .take_while(|&&v| v > floor)
        .fold((0.0, 0), |(s, n), &v| (s + v, n + 1))
}

/// Length of the run of samples strictly below `threshold`, starting at `start`
pub fn run_below(values: &[f32], threshold: f32, start: usize) -> usize {
    values
        .iter()
        .skip(start)
        .take_while(|&&v| v < threshold)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_sum() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0, 6.0]), 4.0);
        assert_eq!(sum(&[1.0, 2.5]), 3.5);
    }

    #[test]
    fn test_sum_while_above() {
        assert_eq!(sum_while_above(&[10.0, 8.0, 5.0, 20.0], 5.0), (18.0, 2));
        assert_eq!(sum_while_above(&[3.0, 8.0], 5.0), (0.0, 0));
        assert_eq!(sum_while_above(&[6.0, 7.0], 5.0), (13.0, 2));
    }

    #[test]
    fn test_run_below() {
        let values = [50.0, 0.0, 10.0, 60.0, 0.0];
        assert_eq!(run_below(&values, 50.0, 1), 2);
        assert_eq!(run_below(&values, 50.0, 0), 0);
        assert_eq!(run_below(&values, 50.0, 9), 0);
    }
}
