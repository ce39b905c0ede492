//! Command handler tests
//!
//! Cheap paths only: dispatch, info output, and the error paths every
//! handler shares. Full pipeline runs live in the integration tests.

use crate::cli::commands::run_command;
use crate::config::parse_args;

fn run_quiet(args: &[&str]) -> Result<(), String> {
    let mut full = vec!["convertir", "--quiet"];
    full.extend_from_slice(args);
    let cli = parse_args(full).expect("test arguments must parse");
    run_command(cli)
}

#[test]
fn test_info_text_succeeds() {
    assert!(run_quiet(&["info", "tiny"]).is_ok());
}

#[test]
fn test_info_json_succeeds() {
    assert!(run_quiet(&["info", "large-v3", "--format", "json"]).is_ok());
}

#[test]
fn test_info_yaml_succeeds() {
    assert!(run_quiet(&["info", "base", "--format", "yaml"]).is_ok());
}

#[test]
fn test_convert_missing_checkpoint_fails() {
    let result = run_quiet(&["convert", "base", "--checkpoint", "/nonexistent/ggml-base.safetensors"]);
    let err = result.unwrap_err();
    assert!(err.contains("Failed to load checkpoint"), "unexpected error: {err}");
}

#[test]
fn test_prune_missing_checkpoint_fails() {
    let result = run_quiet(&["prune", "small", "--checkpoint", "/nonexistent/ckpt.safetensors"]);
    assert!(result.unwrap_err().contains("Failed to load checkpoint"));
}

#[test]
fn test_verify_missing_original_fails() {
    let result = run_quiet(&["verify", "medium", "--checkpoint", "/nonexistent/ckpt.safetensors"]);
    assert!(result.unwrap_err().contains("original checkpoint"));
}

#[test]
fn test_convert_rejects_malformed_checkpoint() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("ggml-base.safetensors");
    std::fs::write(&path, b"garbage").unwrap();

    let result = run_quiet(&["convert", "base", "--checkpoint", path.to_str().unwrap()]);
    assert!(result.is_err());
}
