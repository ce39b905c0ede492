//! Convertir CLI
//!
//! Encoder conversion entry point.
//!
//! # Usage
//!
//! ```bash
//! # Convert a checkpoint into an inference package
//! convertir convert base
//!
//! # Convert with feed-forward pruning and a report sidecar
//! convertir convert large-v3 --prune --report prune_report.json
//!
//! # Prune to a smaller checkpoint without converting
//! convertir prune large-v3 --output ggml-large-v3-pruned.safetensors
//!
//! # Compare pruned output against the original
//! convertir verify large-v3 --seed 42
//!
//! # Show model dimensions
//! convertir info medium
//! ```

use clap::Parser;
use convertir::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
