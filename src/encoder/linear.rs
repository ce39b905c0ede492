//! Linear layer

use ndarray::{Array1, Array2};

/// Dense projection, `y = x W^T + b`.
///
/// Weight is stored `[out_features, in_features]`, matching checkpoint
/// layout, so the forward pass multiplies by the transpose.
#[derive(Debug, Clone, PartialEq)]
pub struct Linear {
    pub weight: Array2<f32>,
    pub bias: Option<Array1<f32>>,
}

impl Linear {
    /// Create a layer from weight `[out, in]` and optional bias `[out]`.
    pub fn new(weight: Array2<f32>, bias: Option<Array1<f32>>) -> Self {
        if let Some(b) = &bias {
            debug_assert_eq!(weight.nrows(), b.len());
        }
        Self { weight, bias }
    }

    pub fn in_features(&self) -> usize {
        self.weight.ncols()
    }

    pub fn out_features(&self) -> usize {
        self.weight.nrows()
    }

    /// Forward pass over `[seq, in]`, producing `[seq, out]`.
    pub fn forward(&self, x: &Array2<f32>) -> Array2<f32> {
        let mut y = x.dot(&self.weight.t());
        if let Some(bias) = &self.bias {
            y += bias;
        }
        y
    }
}
