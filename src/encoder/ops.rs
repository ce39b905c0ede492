//! Elementwise and positional primitives shared across encoder layers

use ndarray::{Array2, ArrayViewMut2};

/// GELU activation (tanh approximation), applied in place.
pub fn gelu_inplace(mut x: ArrayViewMut2<'_, f32>) {
    const SQRT_2_OVER_PI: f32 = 0.797_884_6;
    const GELU_COEFF: f32 = 0.044_715;

    for v in x.iter_mut() {
        let x3 = *v * *v * *v;
        let inner = SQRT_2_OVER_PI * (*v + GELU_COEFF * x3);
        *v = 0.5 * *v * (1.0 + inner.tanh());
    }
}

/// Row-wise softmax with max subtraction for numeric stability.
pub fn softmax_rows(x: &mut Array2<f32>) {
    for mut row in x.rows_mut() {
        let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mut sum = 0.0;
        for v in row.iter_mut() {
            *v = (*v - max).exp();
            sum += *v;
        }
        for v in row.iter_mut() {
            *v /= sum;
        }
    }
}

/// Sinusoidal positional embedding, `[length, channels]`.
///
/// First half of each row is sines, second half cosines, with timescales
/// log-spaced from 1 to 10000. `channels` must be even.
pub fn sinusoids(length: usize, channels: usize) -> Array2<f32> {
    assert!(channels % 2 == 0, "positional embedding channels must be even");
    let half = channels / 2;
    let log_timescale_increment = (10_000f32).ln() / (half as f32 - 1.0);

    let mut out = Array2::zeros((length, channels));
    for pos in 0..length {
        for i in 0..half {
            let inv_timescale = (-(i as f32) * log_timescale_increment).exp();
            let scaled_time = pos as f32 * inv_timescale;
            out[[pos, i]] = scaled_time.sin();
            out[[pos, half + i]] = scaled_time.cos();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_gelu_zero_and_sign() {
        let mut x = array![[0.0f32, 1.0, -1.0, 10.0]];
        gelu_inplace(x.view_mut());
        assert_eq!(x[[0, 0]], 0.0);
        // GELU(1) ~= 0.8412
        assert_relative_eq!(x[[0, 1]], 0.8412, epsilon = 1e-3);
        // GELU(-1) ~= -0.1588
        assert_relative_eq!(x[[0, 2]], -0.1588, epsilon = 1e-3);
        // Large positive inputs pass through
        assert_relative_eq!(x[[0, 3]], 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let mut x = array![[1.0f32, 2.0, 3.0], [100.0, 100.0, 100.0]];
        softmax_rows(&mut x);
        for row in x.rows() {
            let sum: f32 = row.sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
        }
        // Uniform input gives uniform output
        assert_relative_eq!(x[[1, 0]], 1.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_softmax_large_values_stable() {
        let mut x = array![[1000.0f32, 1001.0]];
        softmax_rows(&mut x);
        assert!(x.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_sinusoids_shape_and_first_position() {
        let pos = sinusoids(8, 6);
        assert_eq!(pos.shape(), &[8, 6]);
        // Position 0: sin(0) = 0, cos(0) = 1
        for i in 0..3 {
            assert_eq!(pos[[0, i]], 0.0);
            assert_eq!(pos[[0, 3 + i]], 1.0);
        }
    }

    #[test]
    fn test_sinusoids_deterministic() {
        let a = sinusoids(16, 8);
        let b = sinusoids(16, 8);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sinusoids_bounded() {
        let pos = sinusoids(100, 64);
        assert!(pos.iter().all(|&v| (-1.0..=1.0).contains(&v)));
    }
}
