//! Pretrained model registry
//!
//! Maps a model-size name to its checkpoint and package filenames. Output
//! names are fixed and derived from the size; there is no versioning or
//! collision handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Supported pretrained encoder variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelSize {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
    LargeV2,
    LargeV3,
}

impl ModelSize {
    /// All registry entries, in ascending parameter count.
    pub fn all() -> &'static [ModelSize] {
        &[
            ModelSize::Tiny,
            ModelSize::Base,
            ModelSize::Small,
            ModelSize::Medium,
            ModelSize::Large,
            ModelSize::LargeV2,
            ModelSize::LargeV3,
        ]
    }

    /// Large variants get their exported package bisected by default.
    pub fn is_large(&self) -> bool {
        matches!(self, ModelSize::Large | ModelSize::LargeV2 | ModelSize::LargeV3)
    }

    /// Checkpoint filename for this size, e.g. `ggml-large-v3.safetensors`.
    pub fn checkpoint_filename(&self) -> String {
        format!("ggml-{self}.safetensors")
    }

    /// Exported package name for this size, e.g. `ggml-base-encoder.encpkg`.
    pub fn package_name(&self) -> String {
        format!("ggml-{self}-encoder.encpkg")
    }

    /// Default filename for a pruned checkpoint.
    pub fn pruned_checkpoint_filename(&self) -> String {
        format!("ggml-{self}-pruned.safetensors")
    }

    /// Resolve the checkpoint path inside `dir`.
    pub fn checkpoint_path(&self, dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(self.checkpoint_filename())
    }

    /// Resolve the package path inside `dir`.
    pub fn package_path(&self, dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(self.package_name())
    }
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large",
            ModelSize::LargeV2 => "large-v2",
            ModelSize::LargeV3 => "large-v3",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ModelSize {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tiny" => Ok(ModelSize::Tiny),
            "base" => Ok(ModelSize::Base),
            "small" => Ok(ModelSize::Small),
            "medium" => Ok(ModelSize::Medium),
            "large" => Ok(ModelSize::Large),
            "large-v2" => Ok(ModelSize::LargeV2),
            "large-v3" => Ok(ModelSize::LargeV3),
            other => Err(crate::Error::UnknownModel(other.to_string())),
        }
    }
}
