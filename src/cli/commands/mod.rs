//! CLI command implementations

mod convert;
mod info;
mod prune;
mod verify;

#[cfg(test)]
mod tests;

use crate::cli::LogLevel;
use crate::config::{Cli, Command};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.verbose, cli.quiet);

    match cli.command {
        Command::Convert(args) => convert::run_convert(args, log_level),
        Command::Prune(args) => prune::run_prune(args, log_level),
        Command::Verify(args) => verify::run_verify(args, log_level),
        Command::Info(args) => info::run_info(args, log_level),
    }
}
