//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Variants are grouped by how a caller should react: rejected input, a failed
//! pipeline step, or a failed model call. `Error::kind` exposes that grouping.
use thiserror::Error;

use crate::types::PipelineStage;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any pipeline step runs (client error).
    InvalidInput,
    /// A pipeline step failed (internal error).
    ProcessingFailure,
    /// The generative model failed or returned a malformed tensor.
    ModelFailure,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("No image uploaded")]
    MissingUpload,

    #[error("Unsupported output format: {format}. Use JPEG, PNG, WEBP, or AVIF.")]
    UnsupportedFormat { format: String },

    #[error("Invalid image file: {0}")]
    UndecodableImage(#[source] image::ImageError),

    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("{stage} failed: {message}")]
    Processing {
        stage: PipelineStage,
        message: String,
    },

    #[error("Failed to encode {format} output: {message}")]
    Encode { format: String, message: String },

    #[error("Failed to load model {path}: {message}")]
    ModelLoad { path: String, message: String },

    #[error("Model inference failed: {0}")]
    Inference(String),

    #[error("Tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Pipeline task failed: {0}")]
    TaskFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },
}

impl Error {
    pub fn processing<E: std::fmt::Display>(stage: PipelineStage, e: E) -> Self {
        Error::Processing {
            stage,
            message: e.to_string(),
        }
    }

    pub fn inference<E: std::fmt::Display>(e: E) -> Self {
        Error::Inference(e.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingUpload | Error::UnsupportedFormat { .. } | Error::UndecodableImage(_) => {
                ErrorKind::InvalidInput
            }
            Error::ModelLoad { .. } | Error::Inference(_) | Error::ShapeMismatch { .. } => {
                ErrorKind::ModelFailure
            }
            Error::EmptyImage { .. }
            | Error::InvalidDimensions { .. }
            | Error::Processing { .. }
            | Error::Encode { .. }
            | Error::TaskFailed(_)
            | Error::Io(_)
            | Error::InvalidArgument { .. } => ErrorKind::ProcessingFailure,
        }
    }

    /// True when the caller sent something we refuse to process.
    pub fn is_client_error(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_input_errors_as_client_errors() {
        assert!(Error::MissingUpload.is_client_error());
        assert!(
            Error::UnsupportedFormat {
                format: "BMP".into()
            }
            .is_client_error()
        );
    }

    #[test]
    fn model_errors_are_not_client_errors() {
        let err = Error::ShapeMismatch {
            expected: "[1, 256, 256, 3]".into(),
            actual: "[1, 3, 256, 256]".into(),
        };
        assert_eq!(err.kind(), ErrorKind::ModelFailure);
        assert!(!err.is_client_error());
    }

    #[test]
    fn processing_error_names_the_stage() {
        let err = Error::processing(PipelineStage::Sketched, "kernel overflow");
        assert_eq!(err.to_string(), "Sketched failed: kernel overflow");
        assert_eq!(err.kind(), ErrorKind::ProcessingFailure);
    }
}
