//! Audio encoder model

use ndarray::Array2;

use crate::{Error, Result};

use super::block::EncoderBlock;
use super::config::EncoderConfig;
use super::conv::Conv1d;
use super::norm::LayerNorm;
use super::ops::gelu_inplace;

/// The encoder: conv stem, positional embedding, block stack, final norm.
///
/// Converts mel-spectrogram features `[n_mels, 2 * n_audio_ctx]` into the
/// hidden representation `[n_audio_ctx, n_audio_state]` consumed by a
/// decoder (out of scope here).
#[derive(Debug, Clone)]
pub struct AudioEncoder {
    pub config: EncoderConfig,
    pub conv1: Conv1d,
    pub conv2: Conv1d,
    pub positional_embedding: Array2<f32>,
    pub blocks: Vec<EncoderBlock>,
    pub ln_post: LayerNorm,
}

impl AudioEncoder {
    /// Forward pass at the fixed input shape.
    ///
    /// Any other mel shape is a shape error; there is no dynamic-shape
    /// support because export traces a single fixed-shape execution.
    pub fn forward(&self, mel: &Array2<f32>) -> Result<Array2<f32>> {
        let expected = [self.config.n_mels, self.config.n_frames()];
        if mel.shape() != expected {
            return Err(Error::shape("encoder input", &expected, mel.shape()));
        }

        let mut x = self.conv1.forward(mel);
        gelu_inplace(x.view_mut());
        let mut x = self.conv2.forward(&x);
        gelu_inplace(x.view_mut());

        // [n_state, n_ctx] -> [n_ctx, n_state]
        let mut x = x.t().to_owned();
        if x.shape() != self.positional_embedding.shape() {
            return Err(Error::shape(
                "positional embedding",
                self.positional_embedding.shape(),
                x.shape(),
            ));
        }
        x += &self.positional_embedding;

        for block in &self.blocks {
            x = block.forward(&x);
        }

        Ok(self.ln_post.forward(&x))
    }

    /// Total learned parameter count, including pruned feed-forward widths.
    pub fn parameter_count(&self) -> usize {
        let conv = |c: &Conv1d| c.weight.len() + c.bias.len();
        let mut total = conv(&self.conv1) + conv(&self.conv2);
        total += self.ln_post.weight.len() + self.ln_post.bias.len();
        for block in &self.blocks {
            total += block.attn_ln.weight.len() + block.attn_ln.bias.len();
            total += block.mlp_ln.weight.len() + block.mlp_ln.bias.len();
            for linear in [
                &block.attn.query,
                &block.attn.key,
                &block.attn.value,
                &block.attn.out,
                &block.mlp.fc1,
                &block.mlp.fc2,
            ] {
                total += linear.weight.len();
                if let Some(b) = &linear.bias {
                    total += b.len();
                }
            }
        }
        total
    }

    /// Per-block feed-forward hidden widths (differ after pruning).
    pub fn hidden_widths(&self) -> Vec<usize> {
        self.blocks.iter().map(|b| b.mlp.hidden_width()).collect()
    }
}
