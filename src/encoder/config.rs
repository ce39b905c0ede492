//! Encoder configuration
//!
//! Dimension presets for every pretrained variant in the registry.

use crate::io::ModelSize;
use serde::{Deserialize, Serialize};

/// Configuration for the audio encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Number of mel-spectrogram input channels
    pub n_mels: usize,
    /// Number of audio context frames after the conv stem (positions)
    pub n_audio_ctx: usize,
    /// Hidden dimension (embedding size)
    pub n_audio_state: usize,
    /// Number of attention heads
    pub n_audio_head: usize,
    /// Number of residual attention blocks
    pub n_audio_layer: usize,
}

impl EncoderConfig {
    /// `tiny` variant
    pub fn tiny() -> Self {
        Self { n_mels: 80, n_audio_ctx: 1500, n_audio_state: 384, n_audio_head: 6, n_audio_layer: 4 }
    }

    /// `base` variant
    pub fn base() -> Self {
        Self { n_mels: 80, n_audio_ctx: 1500, n_audio_state: 512, n_audio_head: 8, n_audio_layer: 6 }
    }

    /// `small` variant
    pub fn small() -> Self {
        Self { n_mels: 80, n_audio_ctx: 1500, n_audio_state: 768, n_audio_head: 12, n_audio_layer: 12 }
    }

    /// `medium` variant
    pub fn medium() -> Self {
        Self {
            n_mels: 80,
            n_audio_ctx: 1500,
            n_audio_state: 1024,
            n_audio_head: 16,
            n_audio_layer: 24,
        }
    }

    /// `large` and `large-v2` variants (identical encoder dimensions)
    pub fn large() -> Self {
        Self {
            n_mels: 80,
            n_audio_ctx: 1500,
            n_audio_state: 1280,
            n_audio_head: 20,
            n_audio_layer: 32,
        }
    }

    /// `large-v3` variant (128 mel bins, otherwise the large encoder)
    pub fn large_v3() -> Self {
        Self { n_mels: 128, ..Self::large() }
    }

    /// Tiny dimensions for unit tests
    pub fn tiny_test() -> Self {
        Self { n_mels: 6, n_audio_ctx: 8, n_audio_state: 16, n_audio_head: 2, n_audio_layer: 2 }
    }

    /// Configuration for a registry entry.
    pub fn for_size(size: ModelSize) -> Self {
        match size {
            ModelSize::Tiny => Self::tiny(),
            ModelSize::Base => Self::base(),
            ModelSize::Small => Self::small(),
            ModelSize::Medium => Self::medium(),
            ModelSize::Large | ModelSize::LargeV2 => Self::large(),
            ModelSize::LargeV3 => Self::large_v3(),
        }
    }

    /// Unpruned feed-forward hidden width (4x expansion).
    pub fn n_mlp(&self) -> usize {
        4 * self.n_audio_state
    }

    /// Per-head dimension.
    pub fn head_dim(&self) -> usize {
        self.n_audio_state / self.n_audio_head
    }

    /// Mel frames the encoder consumes (the conv stem halves this to `n_audio_ctx`).
    pub fn n_frames(&self) -> usize {
        2 * self.n_audio_ctx
    }
}
