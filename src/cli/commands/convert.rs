//! Convert command implementation

use std::path::PathBuf;

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::ConvertArgs;
use crate::convert::{convert, write_package, ConvertOptions};
use crate::encoder::{AudioEncoder, EncoderConfig};
use crate::io::load_checkpoint;
use crate::prune::{prune_encoder, PruneOptions};

pub fn run_convert(args: ConvertArgs, level: LogLevel) -> Result<(), String> {
    let checkpoint_path: PathBuf = args
        .checkpoint
        .clone()
        .unwrap_or_else(|| args.size.checkpoint_path("."));

    log(
        level,
        LogLevel::Normal,
        &format!("Converting {} encoder from {}", args.size, checkpoint_path.display()),
    );

    let config = EncoderConfig::for_size(args.size);
    let params = load_checkpoint(&checkpoint_path)
        .map_err(|e| format!("Failed to load checkpoint: {e}"))?;
    let mut encoder = AudioEncoder::from_params(&config, &params)
        .map_err(|e| format!("Failed to build encoder: {e}"))?;

    log(
        level,
        LogLevel::Verbose,
        &format!("  Blocks: {}, state: {}", config.n_audio_layer, config.n_audio_state),
    );

    if args.prune {
        let report = prune_encoder(&mut encoder, &PruneOptions::default());
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
        for entry in &report.entries {
            log(
                level,
                LogLevel::Verbose,
                &format!(
                    "  block {}: {} -> {} units",
                    entry.block, entry.original_width, entry.retained_width
                ),
            );
        }
        if let Some(report_path) = &args.report {
            report
                .save(report_path)
                .map_err(|e| format!("Failed to write report: {e}"))?;
            log(level, LogLevel::Verbose, &format!("  Report: {}", report_path.display()));
        }
    }

    let options = ConvertOptions {
        compute_units: args.compute_units,
        deployment_target: args.target,
        input_name: args.input_name.clone(),
        output_name: args.output_name.clone(),
        split: args.split,
    };

    let package = convert(&encoder, args.size, &options)
        .map_err(|e| format!("Conversion failed: {e}"))?;
    if package.is_pipeline() {
        log(
            level,
            LogLevel::Normal,
            &format!("Bisected into {} chunks merged as a pipeline", package.chunks.len()),
        );
    }

    let package_dir = write_package(&package, &args.output_dir)
        .map_err(|e| format!("Failed to write package: {e}"))?;
    log(level, LogLevel::Normal, &format!("Wrote {}", package_dir.display()));

    Ok(())
}
