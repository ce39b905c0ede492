//! Verify command implementation
//!
//! Runs the original and pruned encoders on the same seeded random mel
//! input and reports the mean absolute output difference.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::VerifyArgs;
use crate::encoder::{AudioEncoder, EncoderConfig};
use crate::io::load_checkpoint;

/// Mean absolute element difference between two equally-shaped outputs.
pub(crate) fn mean_abs_diff(a: &Array2<f32>, b: &Array2<f32>) -> f32 {
    debug_assert_eq!(a.shape(), b.shape());
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum::<f32>() / a.len() as f32
}

/// Seeded random mel input in `[-1, 1)`.
pub(crate) fn seeded_mel(config: &EncoderConfig, seed: u64) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((config.n_mels, config.n_frames()), |_| {
        rng.random::<f32>() * 2.0 - 1.0
    })
}

pub fn run_verify(args: VerifyArgs, level: LogLevel) -> Result<(), String> {
    let original_path: PathBuf = args
        .checkpoint
        .clone()
        .unwrap_or_else(|| args.size.checkpoint_path("."));
    let pruned_path: PathBuf = args
        .pruned
        .clone()
        .unwrap_or_else(|| PathBuf::from(args.size.pruned_checkpoint_filename()));

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Verifying {} against {}",
            pruned_path.display(),
            original_path.display()
        ),
    );

    let config = EncoderConfig::for_size(args.size);
    let original = load_checkpoint(&original_path)
        .map_err(|e| format!("Failed to load original checkpoint: {e}"))?;
    let original = AudioEncoder::from_params(&config, &original)
        .map_err(|e| format!("Failed to build original encoder: {e}"))?;

    let pruned = load_checkpoint(&pruned_path)
        .map_err(|e| format!("Failed to load pruned checkpoint: {e}"))?;
    let pruned = AudioEncoder::from_params(&config, &pruned)
        .map_err(|e| format!("Failed to build pruned encoder: {e}"))?;

    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  hidden widths: {:?} -> {:?}",
            original.hidden_widths(),
            pruned.hidden_widths()
        ),
    );

    let mel = seeded_mel(&config, args.seed);
    let original_out = original
        .forward(&mel)
        .map_err(|e| format!("Original forward failed: {e}"))?;
    let pruned_out = pruned
        .forward(&mel)
        .map_err(|e| format!("Pruned forward failed: {e}"))?;

    let diff = mean_abs_diff(&original_out, &pruned_out);
    log(level, LogLevel::Normal, &format!("Mean absolute difference: {diff:.6}"));

    if diff > args.tolerance {
        return Err(format!(
            "difference {diff:.6} exceeds tolerance {:.6}",
            args.tolerance
        ));
    }
    Ok(())
}
