use std::io::Cursor;
use std::path::Path;

use image::{ImageReader, RgbaImage};
use tracing::debug;

use crate::error::{Error, Result};

/// Decode uploaded bytes into the RGBA working buffer.
///
/// The container format is guessed from the content, not from a file name.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage> {
    if bytes.is_empty() {
        return Err(Error::MissingUpload);
    }

    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    debug!("Decoding upload of {} bytes as {:?}", bytes.len(), reader.format());
    let image = reader.decode().map_err(Error::UndecodableImage)?;
    Ok(image.to_rgba8())
}

/// Read and decode an image file.
pub fn load_image_file(path: &Path) -> Result<RgbaImage> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    #[test]
    fn decodes_png_to_rgba() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, Rgb([1, 2, 3])));
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();

        let decoded = decode_image(bytes.get_ref()).unwrap();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [1, 2, 3, 255]);
    }

    #[test]
    fn garbage_is_undecodable() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, Error::UndecodableImage(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn empty_upload_is_missing() {
        assert!(matches!(decode_image(&[]), Err(Error::MissingUpload)));
    }
}
