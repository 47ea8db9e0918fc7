//! High-level, ergonomic library API: run the full sketch-to-design transformation
//! on uploaded bytes or on files, or only the sketch preprocessing. Both the CLI and
//! the HTTP service go through these entry points.
use std::path::Path;

use image::{DynamicImage, GrayImage, RgbaImage};
use tracing::{debug, info};

use crate::core::params::PipelineParams;
use crate::core::processing::pipeline::{generate_pipeline, sketch_pipeline};
use crate::error::Result;
use crate::io::{decode_image, encode_image, load_image_file};
use crate::model::Generator;
use crate::types::{OutputFormat, PipelineStage};

/// Result of in-memory processing
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    /// Encoded image in `format`
    pub bytes: Vec<u8>,
}

impl ProcessedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Resolve the requested output format; `None` or an empty value means JPEG.
pub fn parse_output_format(value: Option<&str>) -> Result<OutputFormat> {
    match value.map(str::trim) {
        None | Some("") => Ok(OutputFormat::default()),
        Some(v) => v.parse(),
    }
}

/// Transform an upload: validate the format, decode, run the pipeline and encode.
///
/// The format is checked before the bytes are decoded, so an unsupported format
/// is reported even for garbage uploads.
pub fn process_upload(
    bytes: &[u8],
    output_format: Option<&str>,
    generator: &dyn Generator,
    params: &PipelineParams,
) -> Result<ProcessedImage> {
    let format = parse_output_format(output_format)?;
    process_bytes(bytes, format, generator, params)
}

/// Transform encoded image bytes into encoded bytes of `format`.
pub fn process_bytes(
    bytes: &[u8],
    format: OutputFormat,
    generator: &dyn Generator,
    params: &PipelineParams,
) -> Result<ProcessedImage> {
    let image = decode_image(bytes)?;
    process_image(image, format, generator, params)
}

/// Transform an already decoded image into encoded bytes of `format`.
pub fn process_image(
    image: RgbaImage,
    format: OutputFormat,
    generator: &dyn Generator,
    params: &PipelineParams,
) -> Result<ProcessedImage> {
    let result = generate_pipeline(image, generator, format, params)?;
    let bytes = encode_image(&result, format, params.jpeg_quality)?;
    debug!(stage = %PipelineStage::Serialized, "{} bytes of {}", bytes.len(), format.mime_type());

    Ok(ProcessedImage {
        width: result.width(),
        height: result.height(),
        format,
        bytes,
    })
}

/// Process an image file and write the result to `output`.
///
/// When `format` is `None` it is taken from the output extension, falling back to JPEG.
pub fn process_file_to_path(
    input: &Path,
    output: &Path,
    format: Option<OutputFormat>,
    generator: &dyn Generator,
    params: &PipelineParams,
) -> Result<ProcessedImage> {
    let format = format
        .or_else(|| {
            output
                .extension()
                .and_then(|e| e.to_str())
                .and_then(OutputFormat::from_extension)
        })
        .unwrap_or_default();

    let image = load_image_file(input)?;
    let processed = process_image(image, format, generator, params)?;
    std::fs::write(output, &processed.bytes)?;
    info!(
        "Wrote {}x{} {} to {:?}",
        processed.width, processed.height, format, output
    );
    Ok(processed)
}

/// Run only the background keying and sketch extraction on encoded bytes.
pub fn sketch_bytes(bytes: &[u8], params: &PipelineParams) -> Result<GrayImage> {
    let image = decode_image(bytes)?;
    sketch_pipeline(image, params)
}

/// Run only the preprocessing on a file and save the line art as PNG.
pub fn sketch_file_to_path(
    input: &Path,
    output: &Path,
    params: &PipelineParams,
) -> Result<GrayImage> {
    let image = load_image_file(input)?;
    let sketch = sketch_pipeline(image, params)?;
    let bytes = encode_image(
        &DynamicImage::ImageLuma8(sketch.clone()),
        OutputFormat::PNG,
        params.jpeg_quality,
    )?;
    std::fs::write(output, bytes)?;
    info!(
        "Wrote sketch {}x{} to {:?}",
        sketch.width(),
        sketch.height(),
        output
    );
    Ok(sketch)
}
