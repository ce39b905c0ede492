//! Prune command implementation

use std::path::PathBuf;

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::PruneArgs;
use crate::encoder::{AudioEncoder, EncoderConfig};
use crate::io::{load_checkpoint, save_checkpoint};
use crate::prune::{prune_encoder, PruneOptions};

pub fn run_prune(args: PruneArgs, level: LogLevel) -> Result<(), String> {
    let checkpoint_path: PathBuf = args
        .checkpoint
        .clone()
        .unwrap_or_else(|| args.size.checkpoint_path("."));
    let output_path: PathBuf = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(args.size.pruned_checkpoint_filename()));

    log(
        level,
        LogLevel::Normal,
        &format!("Pruning {} encoder from {}", args.size, checkpoint_path.display()),
    );

    let config = EncoderConfig::for_size(args.size);
    let params = load_checkpoint(&checkpoint_path)
        .map_err(|e| format!("Failed to load checkpoint: {e}"))?;
    let mut encoder = AudioEncoder::from_params(&config, &params)
        .map_err(|e| format!("Failed to build encoder: {e}"))?;

    let options = PruneOptions {
        threshold: args.threshold,
        multiple: args.multiple,
        min_cut: args.min_cut,
    };
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  threshold: {}, multiple: {}, min cut: {}",
            options.threshold, options.multiple, options.min_cut
        ),
    );

    let report = prune_encoder(&mut encoder, &options);
    for entry in &report.entries {
        log(
            level,
            LogLevel::Verbose,
            &format!(
                "  block {}: {} -> {} units (boundary score {:?})",
                entry.block, entry.original_width, entry.retained_width, entry.cut_boundary_score
            ),
        );
    }
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Pruned {} of {} hidden units ({:.1}%)",
            report.cut_units(),
            report.original_units(),
            report.cut_fraction() * 100.0
        ),
    );

    save_checkpoint(&output_path, &encoder.to_params())
        .map_err(|e| format!("Failed to write pruned checkpoint: {e}"))?;
    log(level, LogLevel::Normal, &format!("Wrote {}", output_path.display()));

    if let Some(report_path) = &args.report {
        report
            .save(report_path)
            .map_err(|e| format!("Failed to write report: {e}"))?;
        log(level, LogLevel::Normal, &format!("Wrote {}", report_path.display()));
    }

    Ok(())
}
