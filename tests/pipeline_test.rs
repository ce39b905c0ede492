//! End-to-end pipeline tests
//!
//! Drives the CLI handlers against a synthetic `tiny` checkpoint written
//! through the public I/O surface: prune to a smaller checkpoint, then
//! convert to a package and inspect what landed on disk.

use std::collections::HashMap;
use std::path::Path;

use convertir::cli::run_command;
use convertir::config::parse_args;
use convertir::convert::PackageManifest;
use convertir::encoder::EncoderConfig;
use convertir::io::{load_checkpoint, save_checkpoint, Checkpoint, ModelSize};
use convertir::prune::PruneReport;
use ndarray::ArrayD;
use tempfile::TempDir;

/// Deterministic synthetic checkpoint with every tensor the encoder loads.
fn synthetic_checkpoint(config: &EncoderConfig) -> Checkpoint {
    let mut params: Checkpoint = HashMap::new();
    let mut fill = |name: String, shape: &[usize], scale: f32, offset: f32| {
        let len: usize = shape.iter().product();
        let data: Vec<f32> = (0..len)
            .map(|i| offset + (i as f32 * 0.37).sin() * scale)
            .collect();
        params.insert(name, ArrayD::from_shape_vec(shape.to_vec(), data).expect("valid shape"));
    };

    let n_state = config.n_audio_state;
    let n_mlp = config.n_mlp();

    fill("encoder.conv1.weight".to_string(), &[n_state, config.n_mels, 3], 0.1, 0.0);
    fill("encoder.conv1.bias".to_string(), &[n_state], 0.02, 0.0);
    fill("encoder.conv2.weight".to_string(), &[n_state, n_state, 3], 0.1, 0.0);
    fill("encoder.conv2.bias".to_string(), &[n_state], 0.02, 0.0);
    for i in 0..config.n_audio_layer {
        let prefix = format!("encoder.blocks.{i}");
        fill(format!("{prefix}.attn_ln.weight"), &[n_state], 0.05, 1.0);
        fill(format!("{prefix}.attn_ln.bias"), &[n_state], 0.02, 0.0);
        fill(format!("{prefix}.attn.query.weight"), &[n_state, n_state], 0.05, 0.0);
        fill(format!("{prefix}.attn.query.bias"), &[n_state], 0.02, 0.0);
        fill(format!("{prefix}.attn.key.weight"), &[n_state, n_state], 0.05, 0.0);
        fill(format!("{prefix}.attn.value.weight"), &[n_state, n_state], 0.05, 0.0);
        fill(format!("{prefix}.attn.value.bias"), &[n_state], 0.02, 0.0);
        fill(format!("{prefix}.attn.out.weight"), &[n_state, n_state], 0.05, 0.0);
        fill(format!("{prefix}.attn.out.bias"), &[n_state], 0.02, 0.0);
        fill(format!("{prefix}.mlp_ln.weight"), &[n_state], 0.05, 1.0);
        fill(format!("{prefix}.mlp_ln.bias"), &[n_state], 0.02, 0.0);
        fill(format!("{prefix}.mlp.0.weight"), &[n_mlp, n_state], 0.05, 0.0);
        fill(format!("{prefix}.mlp.0.bias"), &[n_mlp], 0.02, 0.0);
        fill(format!("{prefix}.mlp.2.weight"), &[n_state, n_mlp], 0.05, 0.0);
        fill(format!("{prefix}.mlp.2.bias"), &[n_state], 0.02, 0.0);
    }
    fill("encoder.ln_post.weight".to_string(), &[n_state], 0.05, 1.0);
    fill("encoder.ln_post.bias".to_string(), &[n_state], 0.02, 0.0);

    params
}

fn write_tiny_checkpoint(dir: &Path) -> std::path::PathBuf {
    let config = EncoderConfig::for_size(ModelSize::Tiny);
    let params = synthetic_checkpoint(&config);
    let path = dir.join(ModelSize::Tiny.checkpoint_filename());
    save_checkpoint(&path, &params).expect("checkpoint write must succeed");
    path
}

fn run(args: &[&str]) -> Result<(), String> {
    let mut full = vec!["convertir", "--quiet"];
    full.extend_from_slice(args);
    run_command(parse_args(full).expect("test arguments must parse"))
}

#[test]
fn test_convert_writes_pipeline_package() {
    let tmp = TempDir::new().unwrap();
    let checkpoint = write_tiny_checkpoint(tmp.path());
    let out = tmp.path().join("out");
    std::fs::create_dir(&out).unwrap();

    run(&[
        "convert",
        "tiny",
        "--checkpoint",
        checkpoint.to_str().unwrap(),
        "--output-dir",
        out.to_str().unwrap(),
        "--split",
        "always",
        "--target",
        "ios17",
    ])
    .expect("convert must succeed");

    let package_dir = out.join("ggml-tiny-encoder.encpkg");
    assert!(package_dir.is_dir());

    let manifest = PackageManifest::load(&package_dir).unwrap();
    assert!(manifest.pipeline);
    assert_eq!(manifest.chunks.len(), 2);
    assert_eq!(manifest.model_size, ModelSize::Tiny);
    assert_eq!(manifest.input_name, "logmel_data");

    for chunk in &manifest.chunks {
        assert!(package_dir.join(&chunk.graph_file).exists());
        let weights = load_checkpoint(package_dir.join(&chunk.weights_file)).unwrap();
        assert!(!weights.is_empty());
    }
}

#[test]
fn test_convert_single_chunk_without_split() {
    let tmp = TempDir::new().unwrap();
    let checkpoint = write_tiny_checkpoint(tmp.path());

    run(&[
        "convert",
        "tiny",
        "--checkpoint",
        checkpoint.to_str().unwrap(),
        "--output-dir",
        tmp.path().to_str().unwrap(),
    ])
    .expect("convert must succeed");

    let package_dir = tmp.path().join("ggml-tiny-encoder.encpkg");
    let manifest = PackageManifest::load(&package_dir).unwrap();
    assert!(!manifest.pipeline);
    assert!(package_dir.join("graph.json").exists());
    assert!(package_dir.join("weights.safetensors").exists());
}

#[test]
fn test_prune_command_halves_saturated_blocks() {
    let tmp = TempDir::new().unwrap();
    let checkpoint = write_tiny_checkpoint(tmp.path());
    let output = tmp.path().join("pruned.safetensors");
    let report_path = tmp.path().join("report.json");

    // A threshold above every score marks all units weak, so the cut is
    // clipped to half of each block's width
    run(&[
        "prune",
        "tiny",
        "--checkpoint",
        checkpoint.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--report",
        report_path.to_str().unwrap(),
        "--threshold",
        "1e6",
    ])
    .expect("prune must succeed");

    let config = EncoderConfig::for_size(ModelSize::Tiny);
    let pruned = load_checkpoint(&output).unwrap();
    let fc1 = &pruned["encoder.blocks.0.mlp.0.weight"];
    assert_eq!(fc1.shape(), &[config.n_mlp() / 2, config.n_audio_state]);
    let fc2 = &pruned["encoder.blocks.0.mlp.2.weight"];
    assert_eq!(fc2.shape(), &[config.n_audio_state, config.n_mlp() / 2]);

    let report: PruneReport =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report.entries.len(), config.n_audio_layer);
    assert!(report.entries.iter().all(|e| e.cut_len == config.n_mlp() / 2));
}

#[test]
fn test_prune_default_options_leave_strong_weights_alone() {
    let tmp = TempDir::new().unwrap();
    let checkpoint = write_tiny_checkpoint(tmp.path());
    let output = tmp.path().join("pruned.safetensors");

    // The synthetic weights score well above 0.08, so defaults cut nothing
    run(&[
        "prune",
        "tiny",
        "--checkpoint",
        checkpoint.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ])
    .expect("prune must succeed");

    let original = load_checkpoint(&checkpoint).unwrap();
    let pruned = load_checkpoint(&output).unwrap();
    let name = "encoder.blocks.0.mlp.0.weight";
    assert_eq!(original[name], pruned[name]);
}
