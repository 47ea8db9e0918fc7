//! ONNX Runtime backed generator.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::{Tensor, ValueType};
use tracing::info;

use crate::core::processing::tensor::{ImageTensor, RGB_CHANNELS};
use crate::error::{Error, Result};

use super::Generator;

/// A generator exported to ONNX with an NHWC `[N, H, W, 3]` input.
///
/// The session needs exclusive access to run, so concurrent requests are
/// serialized on the mutex.
pub struct OnnxGenerator {
    session: Mutex<Session>,
    input_size: (u32, u32),
}

impl OnnxGenerator {
    /// Load the model and read its spatial input size.
    ///
    /// `size_override` (`(width, height)`) is required when the model declares
    /// dynamic height or width.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded or its input is not NHWC RGB.
    pub fn load(path: &Path, size_override: Option<(u32, u32)>) -> Result<Self> {
        let load_error = |message: String| Error::ModelLoad {
            path: path.display().to_string(),
            message,
        };

        let session = Session::builder()
            .and_then(|builder| builder.commit_from_file(path))
            .map_err(|e| load_error(e.to_string()))?;

        let input = session
            .inputs
            .first()
            .ok_or_else(|| load_error("model declares no inputs".to_string()))?;
        let dims: Vec<i64> = match &input.input_type {
            ValueType::Tensor { shape, .. } => shape.iter().copied().collect(),
            other => return Err(load_error(format!("input is not a tensor: {other:?}"))),
        };

        let input_size = resolve_input_size(&dims, size_override).map_err(load_error)?;
        info!(
            "Loaded model {} (input '{}', size {}x{})",
            path.display(),
            input.name,
            input_size.0,
            input_size.1
        );

        Ok(Self {
            session: Mutex::new(session),
            input_size,
        })
    }
}

/// Pick `(width, height)` from an NHWC shape; negative dims are dynamic.
fn resolve_input_size(
    dims: &[i64],
    size_override: Option<(u32, u32)>,
) -> std::result::Result<(u32, u32), String> {
    if dims.len() != 4 {
        return Err(format!("expected a 4D NHWC input, got shape {dims:?}"));
    }
    if dims[3] >= 0 && dims[3] != RGB_CHANNELS as i64 {
        return Err(format!("expected 3 input channels (NHWC), got shape {dims:?}"));
    }
    if let Some(size) = size_override {
        return Ok(size);
    }
    match (u32::try_from(dims[2]), u32::try_from(dims[1])) {
        (Ok(width), Ok(height)) if width > 0 && height > 0 => Ok((width, height)),
        _ => Err(format!(
            "model has dynamic spatial dimensions {dims:?}; pass an explicit input size"
        )),
    }
}

impl Generator for OnnxGenerator {
    fn input_size(&self) -> (u32, u32) {
        self.input_size
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn predict(&self, input: &ImageTensor) -> Result<ImageTensor> {
        let input_value = Tensor::from_array(input.clone()).map_err(Error::inference)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| Error::Inference("model session lock poisoned".to_string()))?;
        let outputs = session
            .run(ort::inputs![input_value])
            .map_err(Error::inference)?;

        let output = outputs
            .values()
            .next()
            .ok_or_else(|| Error::ShapeMismatch {
                expected: "one output tensor".to_string(),
                actual: "no output".to_string(),
            })?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(Error::inference)?;
        let dims: Vec<usize> = shape.iter().map(|&x| x.max(0) as usize).collect();
        if dims.len() != 4 {
            return Err(Error::ShapeMismatch {
                expected: "4D tensor".to_string(),
                actual: format!("{}D tensor", dims.len()),
            });
        }

        ImageTensor::from_shape_vec((dims[0], dims[1], dims[2], dims[3]), data.to_vec()).map_err(
            |_| Error::ShapeMismatch {
                expected: format!("{dims:?}"),
                actual: format!("{} values", data.len()),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_nhwc_shape() {
        assert_eq!(resolve_input_size(&[1, 256, 512, 3], None), Ok((512, 256)));
        assert_eq!(resolve_input_size(&[-1, 256, 256, 3], None), Ok((256, 256)));
    }

    #[test]
    fn dynamic_shape_needs_override() {
        assert!(resolve_input_size(&[1, -1, -1, 3], None).is_err());
        assert_eq!(
            resolve_input_size(&[1, -1, -1, 3], Some((128, 64))),
            Ok((128, 64))
        );
    }

    #[test]
    fn channel_first_is_rejected() {
        assert!(resolve_input_size(&[1, 3, 256, 256], None).is_err());
        assert!(resolve_input_size(&[256, 256, 3], None).is_err());
    }
}
