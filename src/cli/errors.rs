use std::path::PathBuf;

use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Model file not found: {path}")]
    MissingModel { path: PathBuf },

    #[error("Input file not found: {path}")]
    MissingInput { path: PathBuf },

    #[error("This build has no model backend; rebuild with the `onnx` feature")]
    BackendUnavailable,

    #[error(transparent)]
    Lustre(#[from] lustre::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
