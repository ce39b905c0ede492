//! On-disk package layout
//!
//! A package is a directory named `ggml-{size}-encoder.encpkg` holding a
//! `manifest.json` plus one graph/weights pair per chunk. Single-chunk
//! packages keep both files at the root; pipeline packages nest them under
//! `chunks/chunk-NNN/`. An existing package at the target path is replaced
//! outright.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::io::{save_checkpoint, Checkpoint, ModelSize};
use crate::trace::TracedGraph;
use crate::{Error, Result};

use super::options::ConvertOptions;

/// Current manifest schema version.
pub const FORMAT_VERSION: u32 = 1;

/// One exported graph segment with its weight payload.
#[derive(Debug, Clone)]
pub struct PackageChunk {
    pub graph: TracedGraph,
    pub weights: Checkpoint,
}

/// An assembled package, not yet written to disk.
#[derive(Debug, Clone)]
pub struct EncoderPackage {
    pub size: ModelSize,
    pub options: ConvertOptions,
    pub chunks: Vec<PackageChunk>,
}

impl EncoderPackage {
    /// Pipeline packages carry more than one chunk.
    pub fn is_pipeline(&self) -> bool {
        self.chunks.len() > 1
    }
}

/// Manifest entry for one chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkManifest {
    pub graph_file: String,
    pub weights_file: String,
    pub sha256: String,
    pub op_count: usize,
}

/// The package manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub format_version: u32,
    pub name: String,
    pub model_size: ModelSize,
    pub compute_units: super::ComputeUnits,
    pub deployment_target: super::DeploymentTarget,
    pub input_name: String,
    pub output_name: String,
    /// True when the chunks form a merged pipeline
    pub pipeline: bool,
    pub created_at: String,
    pub chunks: Vec<ChunkManifest>,
}

impl PackageManifest {
    /// Read `manifest.json` from a package directory.
    pub fn load(package_dir: impl AsRef<Path>) -> Result<Self> {
        let path = package_dir.as_ref().join("manifest.json");
        let json = std::fs::read_to_string(&path)
            .map_err(|e| Error::Package(format!("failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&json)
            .map_err(|e| Error::Package(format!("invalid manifest: {e}")))
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn write_chunk(
    package_dir: &Path,
    chunk_dir: &str,
    chunk: &PackageChunk,
) -> Result<ChunkManifest> {
    let dir = if chunk_dir.is_empty() {
        package_dir.to_path_buf()
    } else {
        let dir = package_dir.join(chunk_dir);
        std::fs::create_dir_all(&dir)?;
        dir
    };

    let graph_json = serde_json::to_string_pretty(&chunk.graph)
        .map_err(|e| Error::Package(format!("failed to serialize graph: {e}")))?;
    std::fs::write(dir.join("graph.json"), graph_json)?;

    let weights_path = dir.join("weights.safetensors");
    save_checkpoint(&weights_path, &chunk.weights)?;
    let weight_bytes = std::fs::read(&weights_path)?;

    let rel = |file: &str| {
        if chunk_dir.is_empty() {
            file.to_string()
        } else {
            format!("{chunk_dir}/{file}")
        }
    };

    Ok(ChunkManifest {
        graph_file: rel("graph.json"),
        weights_file: rel("weights.safetensors"),
        sha256: sha256_hex(&weight_bytes),
        op_count: chunk.graph.op_count(),
    })
}

/// Write a package under `output_dir`, replacing any previous export.
///
/// Returns the package directory path.
pub fn write_package(package: &EncoderPackage, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let package_dir = package.size.package_path(output_dir);
    if package_dir.exists() {
        std::fs::remove_dir_all(&package_dir)?;
    }
    std::fs::create_dir_all(&package_dir)?;

    let mut chunk_manifests = Vec::with_capacity(package.chunks.len());
    if package.is_pipeline() {
        for (i, chunk) in package.chunks.iter().enumerate() {
            chunk_manifests.push(write_chunk(&package_dir, &format!("chunks/chunk-{i:03}"), chunk)?);
        }
    } else {
        let chunk = package
            .chunks
            .first()
            .ok_or_else(|| Error::Package("package has no chunks".to_string()))?;
        chunk_manifests.push(write_chunk(&package_dir, "", chunk)?);
    }

    let manifest = PackageManifest {
        format_version: FORMAT_VERSION,
        name: package.size.package_name(),
        model_size: package.size,
        compute_units: package.options.compute_units,
        deployment_target: package.options.deployment_target,
        input_name: package.options.input_name.clone(),
        output_name: package.options.output_name.clone(),
        pipeline: package.is_pipeline(),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        chunks: chunk_manifests,
    };

    let manifest_json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| Error::Package(format!("failed to serialize manifest: {e}")))?;
    std::fs::write(package_dir.join("manifest.json"), manifest_json)?;

    Ok(package_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{convert, ConvertOptions, SplitPolicy};
    use crate::encoder::weights::tests::synthetic_params;
    use crate::encoder::{AudioEncoder, EncoderConfig};
    use crate::io::load_checkpoint;
    use tempfile::TempDir;

    fn test_package(split: SplitPolicy) -> EncoderPackage {
        let config = EncoderConfig::tiny_test();
        let params = synthetic_params(&config, 8);
        let encoder = AudioEncoder::from_params(&config, &params).unwrap();
        let options = ConvertOptions { split, ..ConvertOptions::default() };
        convert(&encoder, ModelSize::Base, &options).unwrap()
    }

    #[test]
    fn test_write_single_chunk_layout() {
        let tmp = TempDir::new().unwrap();
        let package = test_package(SplitPolicy::Never);
        let dir = write_package(&package, tmp.path()).unwrap();

        assert_eq!(dir, tmp.path().join("ggml-base-encoder.encpkg"));
        assert!(dir.join("manifest.json").exists());
        assert!(dir.join("graph.json").exists());
        assert!(dir.join("weights.safetensors").exists());
    }

    #[test]
    fn test_write_pipeline_layout() {
        let tmp = TempDir::new().unwrap();
        let package = test_package(SplitPolicy::Always);
        let dir = write_package(&package, tmp.path()).unwrap();

        let manifest = PackageManifest::load(&dir).unwrap();
        assert!(manifest.pipeline);
        assert_eq!(manifest.chunks.len(), 2);
        for chunk in &manifest.chunks {
            assert!(dir.join(&chunk.graph_file).exists());
            assert!(dir.join(&chunk.weights_file).exists());
        }
    }

    #[test]
    fn test_manifest_contents() {
        let tmp = TempDir::new().unwrap();
        let package = test_package(SplitPolicy::Never);
        let dir = write_package(&package, tmp.path()).unwrap();

        let manifest = PackageManifest::load(&dir).unwrap();
        assert_eq!(manifest.format_version, FORMAT_VERSION);
        assert_eq!(manifest.model_size, ModelSize::Base);
        assert_eq!(manifest.name, "ggml-base-encoder.encpkg");
        assert_eq!(manifest.input_name, "logmel_data");
        assert!(!manifest.pipeline);
        assert_eq!(manifest.chunks[0].op_count, package.chunks[0].graph.op_count());
    }

    #[test]
    fn test_weight_checksum_matches_payload() {
        let tmp = TempDir::new().unwrap();
        let package = test_package(SplitPolicy::Never);
        let dir = write_package(&package, tmp.path()).unwrap();

        let manifest = PackageManifest::load(&dir).unwrap();
        let bytes = std::fs::read(dir.join(&manifest.chunks[0].weights_file)).unwrap();
        assert_eq!(sha256_hex(&bytes), manifest.chunks[0].sha256);
    }

    #[test]
    fn test_weights_readable_as_safetensors() {
        let tmp = TempDir::new().unwrap();
        let package = test_package(SplitPolicy::Never);
        let dir = write_package(&package, tmp.path()).unwrap();

        let weights = load_checkpoint(dir.join("weights.safetensors")).unwrap();
        assert_eq!(weights.len(), package.chunks[0].weights.len());
        assert!(weights.contains_key("encoder.conv1.weight"));
    }

    #[test]
    fn test_existing_package_is_replaced() {
        let tmp = TempDir::new().unwrap();
        let package = test_package(SplitPolicy::Never);
        let dir = write_package(&package, tmp.path()).unwrap();

        // Leave a stray file from the "previous" export
        std::fs::write(dir.join("stale.bin"), b"old").unwrap();
        let dir = write_package(&package, tmp.path()).unwrap();
        assert!(!dir.join("stale.bin").exists());
        assert!(dir.join("manifest.json").exists());
    }

    #[test]
    fn test_graph_json_round_trips() {
        let tmp = TempDir::new().unwrap();
        let package = test_package(SplitPolicy::Never);
        let dir = write_package(&package, tmp.path()).unwrap();

        let json = std::fs::read_to_string(dir.join("graph.json")).unwrap();
        let graph: crate::trace::TracedGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(graph, package.chunks[0].graph);
    }
}
