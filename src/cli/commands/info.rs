//! Info command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{InfoArgs, OutputFormat};
use crate::encoder::EncoderConfig;

/// Unpruned encoder parameter count, computed from dimensions alone.
pub(crate) fn parameter_count(config: &EncoderConfig) -> usize {
    let n_state = config.n_audio_state;
    let n_mlp = config.n_mlp();

    let conv1 = n_state * config.n_mels * 3 + n_state;
    let conv2 = n_state * n_state * 3 + n_state;
    // Two layer norms, four attention projections (key has no bias), two
    // feed-forward projections
    let per_block = 4 * n_state
        + 4 * n_state * n_state
        + 3 * n_state
        + 2 * n_state * n_mlp
        + n_mlp
        + n_state;
    let ln_post = 2 * n_state;

    conv1 + conv2 + per_block * config.n_audio_layer + ln_post
}

pub fn run_info(args: InfoArgs, level: LogLevel) -> Result<(), String> {
    let config = EncoderConfig::for_size(args.size);
    let params = parameter_count(&config);

    match args.format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let value = serde_json::json!({
                "size": args.size,
                "n_mels": config.n_mels,
                "n_audio_ctx": config.n_audio_ctx,
                "n_audio_state": config.n_audio_state,
                "n_audio_head": config.n_audio_head,
                "n_audio_layer": config.n_audio_layer,
                "n_mlp": config.n_mlp(),
                "parameters": params,
                "checkpoint": args.size.checkpoint_filename(),
                "package": args.size.package_name(),
                "bisected_by_default": args.size.is_large(),
            });
            let rendered = if args.format == OutputFormat::Json {
                serde_json::to_string_pretty(&value)
                    .map_err(|e| format!("Failed to serialize info: {e}"))?
            } else {
                serde_yaml::to_string(&value)
                    .map_err(|e| format!("Failed to serialize info: {e}"))?
            };
            log(level, LogLevel::Normal, &rendered);
        }
        OutputFormat::Text => {
            log(level, LogLevel::Normal, &format!("Model:        {}", args.size));
            log(level, LogLevel::Normal, &format!("Mel bins:     {}", config.n_mels));
            log(level, LogLevel::Normal, &format!("Context:      {}", config.n_audio_ctx));
            log(level, LogLevel::Normal, &format!("State:        {}", config.n_audio_state));
            log(level, LogLevel::Normal, &format!("Heads:        {}", config.n_audio_head));
            log(level, LogLevel::Normal, &format!("Blocks:       {}", config.n_audio_layer));
            log(level, LogLevel::Normal, &format!("FFN width:    {}", config.n_mlp()));
            log(level, LogLevel::Normal, &format!("Parameters:   {params}"));
            log(
                level,
                LogLevel::Normal,
                &format!("Package:      {}", args.size.package_name()),
            );
            if args.size.is_large() {
                log(level, LogLevel::Normal, "Split:        bisected pipeline by default");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::weights::tests::synthetic_params;
    use crate::encoder::AudioEncoder;

    #[test]
    fn test_parameter_count_matches_built_encoder() {
        let config = EncoderConfig::tiny_test();
        let params = synthetic_params(&config, 1);
        let encoder = AudioEncoder::from_params(&config, &params).unwrap();
        assert_eq!(parameter_count(&config), encoder.parameter_count());
    }

    #[test]
    fn test_parameter_count_scales_with_layers() {
        let small = EncoderConfig::small();
        let medium = EncoderConfig::medium();
        assert!(parameter_count(&medium) > parameter_count(&small));
    }
}
