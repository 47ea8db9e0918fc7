//! Generator boundary: the opaque `predict(tensor) -> tensor` model call.
//!
//! The model is loaded once at startup, its fixed input size is introspected
//! once, and it is then shared read-only between requests.

#[cfg(feature = "onnx")]
mod onnx;

#[cfg(feature = "onnx")]
pub use onnx::OnnxGenerator;

use crate::core::processing::tensor::{ImageTensor, RGB_CHANNELS};
use crate::error::{Error, Result};

/// A fixed-shape image-to-image model.
pub trait Generator: Send + Sync {
    /// Spatial input size as `(width, height)`.
    fn input_size(&self) -> (u32, u32);

    /// Run the model on a `[1, H, W, 3]` tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails.
    fn predict(&self, input: &ImageTensor) -> Result<ImageTensor>;
}

/// Check that a model output is `[1, height, width, 3]` for the given `(width, height)`.
pub fn validate_output(output: &ImageTensor, size: (u32, u32)) -> Result<()> {
    let (width, height) = size;
    let expected = [1, height as usize, width as usize, RGB_CHANNELS];
    if output.shape() != expected {
        return Err(Error::ShapeMismatch {
            expected: format!("{expected:?}"),
            actual: format!("{:?}", output.shape()),
        });
    }
    Ok(())
}

/// Parse a `WIDTHxHEIGHT` size such as `256x256`.
pub fn parse_size(value: &str) -> Result<(u32, u32)> {
    let invalid = || Error::InvalidArgument {
        arg: "input_size",
        value: value.to_string(),
    };
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let width: u32 = w.trim().parse().map_err(|_| invalid())?;
    let height: u32 = h.trim().parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

/// Returns its input unchanged. Stands in for a real model in tests and dry runs.
#[derive(Debug, Clone, Copy)]
pub struct IdentityGenerator {
    width: u32,
    height: u32,
}

impl IdentityGenerator {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Generator for IdentityGenerator {
    fn input_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn predict(&self, input: &ImageTensor) -> Result<ImageTensor> {
        Ok(input.clone())
    }
}
