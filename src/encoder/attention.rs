//! Multi-head self-attention

use ndarray::{s, Array2};

use super::linear::Linear;
use super::ops::softmax_rows;

/// Multi-head self-attention without masking.
///
/// The key projection carries no bias; query, value, and output do. Queries
/// and keys are each scaled by `head_dim^-0.25` before the dot product.
#[derive(Debug, Clone)]
pub struct MultiHeadAttention {
    pub n_head: usize,
    pub query: Linear,
    pub key: Linear,
    pub value: Linear,
    pub out: Linear,
}

impl MultiHeadAttention {
    pub fn new(n_head: usize, query: Linear, key: Linear, value: Linear, out: Linear) -> Self {
        debug_assert_eq!(query.out_features() % n_head, 0);
        Self { n_head, query, key, value, out }
    }

    pub fn n_state(&self) -> usize {
        self.query.out_features()
    }

    pub fn head_dim(&self) -> usize {
        self.n_state() / self.n_head
    }

    /// Forward pass over `[seq, n_state]`.
    pub fn forward(&self, x: &Array2<f32>) -> Array2<f32> {
        let seq = x.nrows();
        let head_dim = self.head_dim();
        let scale = (head_dim as f32).powf(-0.25);

        let q = self.query.forward(x);
        let k = self.key.forward(x);
        let v = self.value.forward(x);

        let mut concat = Array2::zeros((seq, self.n_state()));
        for h in 0..self.n_head {
            let lo = h * head_dim;
            let hi = lo + head_dim;
            let qh = q.slice(s![.., lo..hi]).mapv(|v| v * scale);
            let kh = k.slice(s![.., lo..hi]).mapv(|v| v * scale);
            let vh = v.slice(s![.., lo..hi]);

            let mut attn = qh.dot(&kh.t());
            softmax_rows(&mut attn);
            let wv = attn.dot(&vh);
            concat.slice_mut(s![.., lo..hi]).assign(&wv);
        }

        self.out.forward(&concat)
    }
}
