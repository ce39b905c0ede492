//! Crate-wide error type

use thiserror::Error;

/// Errors surfaced by the conversion pipeline.
///
/// Failures are fatal: the CLI maps them to diagnostics and exits. There is
/// no retry or partial-failure recovery anywhere in the pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem failure while reading or writing artifacts
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Checkpoint could not be parsed or is missing tensors
    #[error("checkpoint error: {0}")]
    Checkpoint(String),

    /// A tensor did not have the shape an operation requires
    #[error("shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    Shape {
        context: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Graph capture failed (dangling tensor reference, shape propagation)
    #[error("trace error: {0}")]
    Trace(String),

    /// Package assembly or serialization failed
    #[error("package error: {0}")]
    Package(String),

    /// Model size string did not match a known pretrained variant
    #[error("unknown model size: {0}")]
    UnknownModel(String),
}

impl Error {
    /// Shorthand for shape errors, the most common failure during loading.
    pub fn shape(context: impl Into<String>, expected: &[usize], actual: &[usize]) -> Self {
        Error::Shape {
            context: context.into(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_error_display() {
        let err = Error::shape("conv1.weight", &[4, 2, 3], &[4, 2]);
        let msg = err.to_string();
        assert!(msg.contains("conv1.weight"));
        assert!(msg.contains("[4, 2, 3]"));
        assert!(msg.contains("[4, 2]"));
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_unknown_model_display() {
        let err = Error::UnknownModel("huge".to_string());
        assert_eq!(err.to_string(), "unknown model size: huge");
    }
}
