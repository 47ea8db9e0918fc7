use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use image::RgbImage;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::PipelineStage;

fn resize_error<E: std::fmt::Display>(e: E) -> Error {
    Error::processing(PipelineStage::Encoded, e)
}

/// Lanczos3 resize of interleaved RGB bytes.
pub fn resize_rgb_data(
    data: &[u8],
    original_cols: usize,
    original_rows: usize,
    target_cols: usize,
    target_rows: usize,
) -> Result<Vec<u8>> {
    let resize_options =
        ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    let mut resizer = Resizer::new();

    let src_image = Image::from_vec_u8(
        original_cols as u32,
        original_rows as u32,
        data.to_vec(),
        PixelType::U8x3,
    )
    .map_err(resize_error)?;
    let mut dst_image = Image::new(target_cols as u32, target_rows as u32, PixelType::U8x3);
    resizer
        .resize(&src_image, &mut dst_image, &resize_options)
        .map_err(resize_error)?;

    Ok(dst_image.into_vec())
}

/// Resize an RGB image to exactly `target_cols` x `target_rows`.
/// Images already at the target size are returned untouched.
pub fn resize_rgb_image(image: RgbImage, target_cols: u32, target_rows: u32) -> Result<RgbImage> {
    let (cols, rows) = image.dimensions();
    if target_cols == 0 || target_rows == 0 {
        return Err(Error::InvalidDimensions {
            width: target_cols,
            height: target_rows,
            reason: "resize target must be non-zero".to_string(),
        });
    }
    if cols == 0 || rows == 0 {
        return Err(Error::EmptyImage {
            width: cols,
            height: rows,
        });
    }
    if (cols, rows) == (target_cols, target_rows) {
        return Ok(image);
    }

    debug!(
        "Resizing {}x{} -> {}x{} (Lanczos3)",
        cols, rows, target_cols, target_rows
    );
    let resized = resize_rgb_data(
        image.as_raw(),
        cols as usize,
        rows as usize,
        target_cols as usize,
        target_rows as usize,
    )?;
    RgbImage::from_raw(target_cols, target_rows, resized)
        .ok_or_else(|| resize_error("resized buffer has unexpected length"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn constant_image_survives_resize() {
        let img = RgbImage::from_pixel(50, 30, Rgb([90, 140, 200]));
        let out = resize_rgb_image(img, 16, 16).unwrap();
        assert_eq!(out.dimensions(), (16, 16));
        for p in out.pixels() {
            for (a, b) in p.0.iter().zip([90u8, 140, 200]) {
                assert!(a.abs_diff(b) <= 1);
            }
        }
    }

    #[test]
    fn same_size_is_a_no_op() {
        let img = RgbImage::from_fn(8, 8, |x, y| Rgb([x as u8, y as u8, 0]));
        let out = resize_rgb_image(img.clone(), 8, 8).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn zero_target_is_rejected() {
        let img = RgbImage::new(4, 4);
        assert!(matches!(
            resize_rgb_image(img, 0, 4),
            Err(Error::InvalidDimensions { .. })
        ));
    }
}
