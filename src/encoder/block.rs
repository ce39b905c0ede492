//! Residual attention block

use ndarray::Array2;

use super::attention::MultiHeadAttention;
use super::feedforward::FeedForward;
use super::norm::LayerNorm;

/// One encoder block: pre-norm attention and pre-norm feed-forward, each
/// with a residual connection.
#[derive(Debug, Clone)]
pub struct EncoderBlock {
    pub attn_ln: LayerNorm,
    pub attn: MultiHeadAttention,
    pub mlp_ln: LayerNorm,
    pub mlp: FeedForward,
}

impl EncoderBlock {
    pub fn new(
        attn_ln: LayerNorm,
        attn: MultiHeadAttention,
        mlp_ln: LayerNorm,
        mlp: FeedForward,
    ) -> Self {
        Self { attn_ln, attn, mlp_ln, mlp }
    }

    /// Forward pass over `[seq, n_state]`.
    pub fn forward(&self, x: &Array2<f32>) -> Array2<f32> {
        let attn_out = self.attn.forward(&self.attn_ln.forward(x));
        let x = x + &attn_out;
        let mlp_out = self.mlp.forward(&self.mlp_ln.forward(&x));
        x + mlp_out
    }
}
