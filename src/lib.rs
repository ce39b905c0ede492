//! Convertir: Speech Encoder Conversion & Pruning Toolkit
//!
//! Converts a pretrained speech-recognition encoder into a self-contained
//! inference package, optionally shrinking each block's feed-forward hidden
//! dimension with a saliency-based pruning heuristic first.
//!
//! The pipeline is a single linear sequence:
//!
//! 1. Load pretrained encoder weights for a named model size ([`io`])
//! 2. Optionally prune feed-forward hidden units per block ([`prune`])
//! 3. Trace the forward computation into a static graph ([`trace`])
//! 4. Convert the traced graph into an on-disk package ([`convert`])
//!
//! # Example
//!
//! ```ignore
//! use convertir::encoder::{AudioEncoder, EncoderConfig};
//! use convertir::prune::{prune_encoder, PruneOptions};
//!
//! let params = convertir::io::load_checkpoint("ggml-base.safetensors")?;
//! let mut encoder = AudioEncoder::from_params(&EncoderConfig::base(), &params)?;
//! let report = prune_encoder(&mut encoder, &PruneOptions::default());
//! println!("retained {} of {} hidden units", report.retained_units(), report.original_units());
//! ```

pub mod cli;
pub mod config;
pub mod convert;
pub mod encoder;
mod error;
pub mod io;
pub mod prune;
pub mod trace;

pub use error::{Error, Result};
