//! Conversion options
//!
//! Compute-unit affinity and the minimum deployment target are declarative:
//! they are recorded in the package manifest for the consuming runtime and
//! change nothing about how the graph is assembled.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::io::ModelSize;

/// Which compute units the consuming runtime should schedule onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComputeUnits {
    CpuOnly,
    CpuAndGpu,
    CpuAndNe,
    All,
}

impl fmt::Display for ComputeUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComputeUnits::CpuOnly => "cpu-only",
            ComputeUnits::CpuAndGpu => "cpu-and-gpu",
            ComputeUnits::CpuAndNe => "cpu-and-ne",
            ComputeUnits::All => "all",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ComputeUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu-only" => Ok(ComputeUnits::CpuOnly),
            "cpu-and-gpu" => Ok(ComputeUnits::CpuAndGpu),
            "cpu-and-ne" => Ok(ComputeUnits::CpuAndNe),
            "all" => Ok(ComputeUnits::All),
            other => Err(format!("unknown compute units: {other}")),
        }
    }
}

/// Minimum platform version the package declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentTarget {
    Ios16,
    Ios17,
    Ios18,
}

impl fmt::Display for DeploymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeploymentTarget::Ios16 => "ios16",
            DeploymentTarget::Ios17 => "ios17",
            DeploymentTarget::Ios18 => "ios18",
        };
        write!(f, "{name}")
    }
}

impl FromStr for DeploymentTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ios16" => Ok(DeploymentTarget::Ios16),
            "ios17" => Ok(DeploymentTarget::Ios17),
            "ios18" => Ok(DeploymentTarget::Ios18),
            other => Err(format!("unknown deployment target: {other}")),
        }
    }
}

/// Whether to bisect the exported graph into a chunked pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitPolicy {
    /// Split only the large variants
    Auto,
    Always,
    Never,
}

impl SplitPolicy {
    pub fn should_split(&self, size: ModelSize) -> bool {
        match self {
            SplitPolicy::Auto => size.is_large(),
            SplitPolicy::Always => true,
            SplitPolicy::Never => false,
        }
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SplitPolicy::Auto => "auto",
            SplitPolicy::Always => "always",
            SplitPolicy::Never => "never",
        };
        write!(f, "{name}")
    }
}

impl FromStr for SplitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(SplitPolicy::Auto),
            "always" => Ok(SplitPolicy::Always),
            "never" => Ok(SplitPolicy::Never),
            other => Err(format!("unknown split policy: {other}")),
        }
    }
}

/// Full conversion configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertOptions {
    pub compute_units: ComputeUnits,
    pub deployment_target: DeploymentTarget,
    pub input_name: String,
    pub output_name: String,
    pub split: SplitPolicy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            compute_units: ComputeUnits::CpuAndNe,
            deployment_target: DeploymentTarget::Ios18,
            input_name: "logmel_data".to_string(),
            output_name: "output".to_string(),
            split: SplitPolicy::Auto,
        }
    }
}
