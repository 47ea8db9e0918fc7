//! In-memory encoders for the final image.
//! JPEG goes through `jpeg-encoder` so the quality is controllable; PNG,
//! lossless WEBP and AVIF use the `image` crate encoders.
pub mod jpeg;

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use crate::error::{Error, Result};
use crate::types::OutputFormat;

use jpeg::encode_rgb_jpeg;

fn image_format(format: OutputFormat) -> ImageFormat {
    match format {
        OutputFormat::JPEG => ImageFormat::Jpeg,
        OutputFormat::PNG => ImageFormat::Png,
        OutputFormat::WEBP => ImageFormat::WebP,
        OutputFormat::AVIF => ImageFormat::Avif,
    }
}

/// Serialize `image` in `format`. `jpeg_quality` only applies to JPEG.
pub fn encode_image(image: &DynamicImage, format: OutputFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    match format {
        OutputFormat::JPEG => {
            let rgb = image.to_rgb8();
            encode_rgb_jpeg(rgb.width(), rgb.height(), rgb.as_raw(), jpeg_quality)
        }
        OutputFormat::PNG | OutputFormat::WEBP | OutputFormat::AVIF => {
            let mut buffer = Cursor::new(Vec::new());
            image
                .write_to(&mut buffer, image_format(format))
                .map_err(|e| Error::Encode {
                    format: format.to_string(),
                    message: e.to_string(),
                })?;
            Ok(buffer.into_inner())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn sample() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(6, 4, Rgba([10, 20, 30, 255])))
    }

    #[test]
    fn png_and_webp_decode_back() {
        for format in [OutputFormat::PNG, OutputFormat::WEBP] {
            let bytes = encode_image(&sample(), format, 75).unwrap();
            let decoded = image::load_from_memory_with_format(&bytes, image_format(format)).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (6, 4));
        }
    }

    #[test]
    fn avif_accepts_rgba_and_rgb() {
        let bytes = encode_image(&sample(), OutputFormat::AVIF, 75).unwrap();
        assert_eq!(&bytes[4..12], b"ftypavif");

        let rgb = DynamicImage::ImageRgb8(sample().to_rgb8());
        let bytes = encode_image(&rgb, OutputFormat::AVIF, 75).unwrap();
        assert_eq!(&bytes[4..12], b"ftypavif");
        assert!(bytes.len() > 12);
    }

    #[test]
    fn jpeg_drops_alpha() {
        let bytes = encode_image(&sample(), OutputFormat::JPEG, 90).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.color().channel_count(), 3);
    }
}
