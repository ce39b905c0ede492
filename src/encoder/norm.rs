//! Layer normalization

use ndarray::{Array1, Array2};

/// LayerNorm over the channel axis with learned scale and shift.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerNorm {
    pub weight: Array1<f32>,
    pub bias: Array1<f32>,
    pub eps: f32,
}

impl LayerNorm {
    pub fn new(weight: Array1<f32>, bias: Array1<f32>) -> Self {
        debug_assert_eq!(weight.len(), bias.len());
        Self { weight, bias, eps: 1e-5 }
    }

    pub fn size(&self) -> usize {
        self.weight.len()
    }

    /// Normalize each row of `[seq, channels]` independently.
    pub fn forward(&self, x: &Array2<f32>) -> Array2<f32> {
        let n = x.ncols() as f32;
        let mut out = x.clone();
        for mut row in out.rows_mut() {
            let mean = row.sum() / n;
            let var = row.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
            let denom = (var + self.eps).sqrt();
            for (i, v) in row.iter_mut().enumerate() {
                *v = (*v - mean) / denom * self.weight[i] + self.bias[i];
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_forward_zero_mean_unit_variance() {
        let norm = LayerNorm::new(Array1::ones(4), Array1::zeros(4));
        let x = array![[1.0f32, 2.0, 3.0, 4.0]];
        let y = norm.forward(&x);

        let mean: f32 = y.row(0).sum() / 4.0;
        let var: f32 = y.row(0).iter().map(|v| (v - mean).powi(2)).sum::<f32>() / 4.0;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-5);
        assert_relative_eq!(var, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_forward_scale_and_shift() {
        let norm = LayerNorm::new(array![2.0f32, 2.0], array![1.0f32, 1.0]);
        let x = array![[-1.0f32, 1.0]];
        let y = norm.forward(&x);
        // Normalized input is [-1, 1]; scaled and shifted gives [-1, 3]
        assert_relative_eq!(y[[0, 0]], -1.0, epsilon = 1e-3);
        assert_relative_eq!(y[[0, 1]], 3.0, epsilon = 1e-3);
    }

    #[test]
    fn test_rows_normalized_independently() {
        let norm = LayerNorm::new(Array1::ones(2), Array1::zeros(2));
        let x = array![[0.0f32, 2.0], [100.0, 102.0]];
        let y = norm.forward(&x);
        assert_relative_eq!(y[[0, 0]], y[[1, 0]], epsilon = 1e-4);
        assert_relative_eq!(y[[0, 1]], y[[1, 1]], epsilon = 1e-4);
    }
}
