//! Audio encoder data model and forward pass
//!
//! This module provides the pretrained speech encoder: a convolutional stem,
//! sinusoidal positional embedding, a stack of residual attention blocks,
//! and a final layer normalization. Weights are loaded from checkpoints via
//! [`AudioEncoder::from_params`]; the decoder is out of scope.

mod attention;
mod block;
mod config;
mod conv;
mod feedforward;
mod linear;
mod model;
mod norm;
mod ops;
pub(crate) mod weights;

pub use attention::MultiHeadAttention;
pub use block::EncoderBlock;
pub use config::EncoderConfig;
pub use conv::Conv1d;
pub use feedforward::FeedForward;
pub use linear::Linear;
pub use model::AudioEncoder;
pub use norm::LayerNorm;
pub use ops::{gelu_inplace, sinusoids, softmax_rows};
