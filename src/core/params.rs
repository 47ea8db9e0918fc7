use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default color-distance threshold for background keying.
pub const DEFAULT_BACKGROUND_THRESHOLD: u32 = 190;

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Pipeline tunables suitable for config files and presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    /// Sum of per-channel differences at or below which a pixel counts as background
    pub background_threshold: u32,
    /// Quality used by the JPEG writer; ignored by other formats
    pub jpeg_quality: u8,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            background_threshold: DEFAULT_BACKGROUND_THRESHOLD,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl PipelineParams {
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(Error::InvalidArgument {
                arg: "jpeg_quality",
                value: self.jpeg_quality.to_string(),
            });
        }
        Ok(())
    }

    /// Load a JSON preset; missing fields fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let params: PipelineParams =
            serde_json::from_str(&text).map_err(|e| Error::InvalidArgument {
                arg: "params",
                value: format!("{}: {}", path.display(), e),
            })?;
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_preset_keeps_defaults() {
        let params: PipelineParams = serde_json::from_str(r#"{"jpeg_quality": 90}"#).unwrap();
        assert_eq!(params.jpeg_quality, 90);
        assert_eq!(params.background_threshold, DEFAULT_BACKGROUND_THRESHOLD);
    }

    #[test]
    fn zero_quality_is_rejected() {
        let params = PipelineParams {
            jpeg_quality: 0,
            ..PipelineParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn loads_preset_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preset.json");
        std::fs::write(&path, r#"{"background_threshold": 60}"#).unwrap();

        let params = PipelineParams::from_json_file(&path).unwrap();
        assert_eq!(params.background_threshold, 60);
        assert_eq!(params.jpeg_quality, DEFAULT_JPEG_QUALITY);
    }
}
