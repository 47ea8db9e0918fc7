//! Shared types used across LUSTRE.
//! Includes `OutputFormat`, the `Color` used for background keying, and the
//! `PipelineStage` states the orchestrator moves through.
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, ValueEnum, Serialize, Deserialize,
)]
pub enum OutputFormat {
    #[default]
    JPEG,
    PNG,
    WEBP,
    AVIF,
}

impl OutputFormat {
    /// Formats that go through the promote-and-composite-onto-white path.
    pub fn supports_alpha(self) -> bool {
        matches!(self, OutputFormat::PNG | OutputFormat::WEBP)
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::JPEG => "image/jpeg",
            OutputFormat::PNG => "image/png",
            OutputFormat::WEBP => "image/webp",
            OutputFormat::AVIF => "image/avif",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::JPEG => "jpg",
            OutputFormat::PNG => "png",
            OutputFormat::WEBP => "webp",
            OutputFormat::AVIF => "avif",
        }
    }

    /// Guess the format from a file extension (`jpg`, `jpeg`, `png`, ...).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::JPEG),
            "png" => Some(OutputFormat::PNG),
            "webp" => Some(OutputFormat::WEBP),
            "avif" => Some(OutputFormat::AVIF),
            _ => None,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JPEG" => Ok(OutputFormat::JPEG),
            "PNG" => Ok(OutputFormat::PNG),
            "WEBP" => Ok(OutputFormat::WEBP),
            "AVIF" => Ok(OutputFormat::AVIF),
            _ => Err(Error::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutputFormat::JPEG => "JPEG",
            OutputFormat::PNG => "PNG",
            OutputFormat::WEBP => "WEBP",
            OutputFormat::AVIF => "AVIF",
        };
        write!(f, "{}", s)
    }
}

/// An opaque RGB color used for distance comparisons.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255]);

    /// Sum of absolute per-channel differences against the first 3 channels of `pixel`.
    pub fn manhattan_distance(self, pixel: &[u8]) -> u32 {
        self.0
            .iter()
            .zip(pixel)
            .map(|(&a, &b)| u32::from(a.abs_diff(b)))
            .sum()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.0[0], self.0[1], self.0[2])
    }
}

/// States of a single pipeline run, in order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum PipelineStage {
    Received,
    ColorSampled,
    BackgroundNormalized,
    Sketched,
    Encoded,
    ModelInvoked,
    Decoded,
    Serialized,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Received => write!(f, "Received"),
            PipelineStage::ColorSampled => write!(f, "ColorSampled"),
            PipelineStage::BackgroundNormalized => write!(f, "BackgroundNormalized"),
            PipelineStage::Sketched => write!(f, "Sketched"),
            PipelineStage::Encoded => write!(f, "Encoded"),
            PipelineStage::ModelInvoked => write!(f, "ModelInvoked"),
            PipelineStage::Decoded => write!(f, "Decoded"),
            PipelineStage::Serialized => write!(f, "Serialized"),
        }
    }
}
