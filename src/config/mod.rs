//! CLI configuration types

mod cli;

pub use cli::{
    parse_args, Cli, Command, ConvertArgs, InfoArgs, OutputFormat, PruneArgs, VerifyArgs,
};
