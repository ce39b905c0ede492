//! Feed-forward sub-module
//!
//! The expand -> GELU -> project pair inside each encoder block. The hidden
//! width is a property of the instance, not the config: pruning rebuilds
//! blocks with narrower hidden dimensions while the rest of the encoder
//! keeps its original shape.

use ndarray::Array2;

use super::linear::Linear;
use super::ops::gelu_inplace;

/// Two-layer feed-forward network with GELU activation.
#[derive(Debug, Clone)]
pub struct FeedForward {
    /// Expansion projection (`n_state -> hidden`)
    pub fc1: Linear,
    /// Output projection (`hidden -> n_state`)
    pub fc2: Linear,
}

impl FeedForward {
    pub fn new(fc1: Linear, fc2: Linear) -> Self {
        debug_assert_eq!(fc1.out_features(), fc2.in_features());
        Self { fc1, fc2 }
    }

    /// Current hidden width (may be smaller than `4 * n_state` after pruning).
    pub fn hidden_width(&self) -> usize {
        self.fc1.out_features()
    }

    /// Forward pass over `[seq, n_state]`.
    pub fn forward(&self, x: &Array2<f32>) -> Array2<f32> {
        let mut hidden = self.fc1.forward(x);
        gelu_inplace(hidden.view_mut());
        self.fc2.forward(&hidden)
    }
}
