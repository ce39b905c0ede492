//! Core CLI types - Cli, Command, and per-command argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use crate::convert::{ComputeUnits, DeploymentTarget, SplitPolicy};
use crate::io::ModelSize;

/// Convertir: Encoder Conversion & Pruning Toolkit
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "convertir")]
#[command(author = "PAIML")]
#[command(version)]
#[command(about = "Convert a pretrained speech encoder into an inference package, with optional feed-forward pruning")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Convert an encoder checkpoint into an inference package
    Convert(ConvertArgs),

    /// Prune feed-forward hidden units and save a smaller checkpoint
    Prune(PruneArgs),

    /// Compare original and pruned encoder outputs on a seeded input
    Verify(VerifyArgs),

    /// Display dimensions and parameter counts for a model size
    Info(InfoArgs),
}

/// Arguments for the convert command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ConvertArgs {
    /// Model size to convert
    #[arg(value_name = "SIZE")]
    pub size: ModelSize,

    /// Checkpoint path (defaults to ./ggml-{size}.safetensors)
    #[arg(short, long)]
    pub checkpoint: Option<PathBuf>,

    /// Directory the package is written into
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Prune feed-forward hidden units before conversion
    #[arg(long)]
    pub prune: bool,

    /// Write the pruning report as JSON (requires --prune)
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Compute units the package declares
    #[arg(long, default_value = "cpu-and-ne")]
    pub compute_units: ComputeUnits,

    /// Minimum deployment target the package declares
    #[arg(long, default_value = "ios18")]
    pub target: DeploymentTarget,

    /// Whether to bisect the package into a chunked pipeline
    #[arg(long, default_value = "auto")]
    pub split: SplitPolicy,

    /// Declared graph input tensor name
    #[arg(long, default_value = "logmel_data")]
    pub input_name: String,

    /// Declared graph output tensor name
    #[arg(long, default_value = "output")]
    pub output_name: String,
}

/// Arguments for the prune command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PruneArgs {
    /// Model size to prune
    #[arg(value_name = "SIZE")]
    pub size: ModelSize,

    /// Checkpoint path (defaults to ./ggml-{size}.safetensors)
    #[arg(short, long)]
    pub checkpoint: Option<PathBuf>,

    /// Output checkpoint path (defaults to ./ggml-{size}-pruned.safetensors)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the pruning report as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Saliency threshold below which units are cut candidates
    #[arg(long, default_value_t = 0.08)]
    pub threshold: f32,

    /// Cut lengths are rounded down to a multiple of this
    #[arg(long, default_value_t = 64)]
    pub multiple: usize,

    /// Cuts smaller than this are dropped entirely
    #[arg(long, default_value_t = 100)]
    pub min_cut: usize,
}

/// Arguments for the verify command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct VerifyArgs {
    /// Model size to verify
    #[arg(value_name = "SIZE")]
    pub size: ModelSize,

    /// Original checkpoint path (defaults to ./ggml-{size}.safetensors)
    #[arg(short, long)]
    pub checkpoint: Option<PathBuf>,

    /// Pruned checkpoint path (defaults to ./ggml-{size}-pruned.safetensors)
    #[arg(short, long)]
    pub pruned: Option<PathBuf>,

    /// Random seed for the mel input
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Maximum acceptable mean absolute output difference
    #[arg(long, default_value_t = 0.1)]
    pub tolerance: f32,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Model size to describe
    #[arg(value_name = "SIZE")]
    pub size: ModelSize,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for the info command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
