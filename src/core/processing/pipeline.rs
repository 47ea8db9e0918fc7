use image::{DynamicImage, GrayImage, RgbaImage};
use tracing::{debug, info_span};

use crate::core::params::PipelineParams;
use crate::core::processing::background::normalize_background;
use crate::core::processing::color::dominant_color;
use crate::core::processing::sketch::to_sketch;
use crate::core::processing::tensor::{from_tensor, to_tensor};
use crate::error::Result;
use crate::model::{Generator, validate_output};
use crate::types::{Color, OutputFormat, PipelineStage};

fn enter(stage: PipelineStage) {
    debug!(%stage, "pipeline stage");
}

/// Whiten the background and extract the line-art sketch.
///
/// The background is keyed twice with the same threshold: first against the
/// dominant color, then against pure white to catch leftover light halos.
pub fn sketch_pipeline(mut image: RgbaImage, params: &PipelineParams) -> Result<GrayImage> {
    let threshold = params.background_threshold;

    let background = dominant_color(&image)?;
    enter(PipelineStage::ColorSampled);
    debug!("Dominant color: {}", background);

    let keyed = normalize_background(&mut image, background, threshold);
    let halo = normalize_background(&mut image, Color::WHITE, threshold);
    enter(PipelineStage::BackgroundNormalized);
    debug!(
        "Background keyed: {} px against {}, {} px against white (threshold {})",
        keyed, background, halo, threshold
    );

    let sketch = to_sketch(&image)?;
    enter(PipelineStage::Sketched);
    Ok(sketch)
}

/// Run the full transformation on a decoded image and return the raster to serialize.
pub fn generate_pipeline(
    image: RgbaImage,
    generator: &dyn Generator,
    format: OutputFormat,
    params: &PipelineParams,
) -> Result<DynamicImage> {
    let (width, height) = image.dimensions();
    let span = info_span!("pipeline", %format, width, height);
    let _guard = span.enter();
    enter(PipelineStage::Received);

    let sketch = sketch_pipeline(image, params)?;

    let input_size = generator.input_size();
    let input = to_tensor(&DynamicImage::ImageLuma8(sketch), input_size)?;
    enter(PipelineStage::Encoded);

    let output = generator.predict(&input)?;
    validate_output(&output, input_size)?;
    enter(PipelineStage::ModelInvoked);

    let result = from_tensor(&output, format)?;
    enter(PipelineStage::Decoded);
    Ok(result)
}
