//! Conversion between raster images and the generator's NHWC tensors.
//!
//! Tensors are `[1, height, width, 3]` with values in `[-1, 1]`.
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use ndarray::Array4;

use crate::core::processing::resize::resize_rgb_image;
use crate::error::{Error, Result};
use crate::types::OutputFormat;

/// Image tensor in NHWC format (batch, height, width, channels).
pub type ImageTensor = Array4<f32>;

/// Number of channels the generator consumes and produces.
pub const RGB_CHANNELS: usize = 3;

/// Flatten to RGB, resize to `(width, height)` with Lanczos3 and scale to `[-1, 1]`.
pub fn to_tensor(image: &DynamicImage, target_size: (u32, u32)) -> Result<ImageTensor> {
    let (target_width, target_height) = target_size;
    let rgb = resize_rgb_image(image.to_rgb8(), target_width, target_height)?;

    let (width, height) = (target_width as usize, target_height as usize);
    let mut tensor = ImageTensor::zeros((1, height, width, RGB_CHANNELS));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for (c, &value) in pixel.0.iter().enumerate() {
            tensor[[0, y as usize, x as usize, c]] = normalize(value);
        }
    }
    Ok(tensor)
}

/// Turn a generator output back into an image ready for `format`.
///
/// PNG and WEBP get an RGBA image composited over opaque white; JPEG and AVIF
/// get plain RGB.
pub fn from_tensor(tensor: &ImageTensor, format: OutputFormat) -> Result<DynamicImage> {
    let rgb = tensor_to_rgb(tensor)?;
    if format.supports_alpha() {
        let rgba = DynamicImage::ImageRgb8(rgb).to_rgba8();
        Ok(DynamicImage::ImageRgba8(composite_over_white(&rgba)))
    } else {
        Ok(DynamicImage::ImageRgb8(rgb))
    }
}

/// Drop the batch dimension and denormalize to 8-bit RGB.
pub fn tensor_to_rgb(tensor: &ImageTensor) -> Result<RgbImage> {
    let (batch, height, width, channels) = tensor.dim();
    if batch != 1 || channels != RGB_CHANNELS || height == 0 || width == 0 {
        return Err(Error::ShapeMismatch {
            expected: "[1, H, W, 3]".to_string(),
            actual: format!("{:?}", tensor.shape()),
        });
    }

    Ok(RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        Rgb([
            denormalize(tensor[[0, y, x, 0]]),
            denormalize(tensor[[0, y, x, 1]]),
            denormalize(tensor[[0, y, x, 2]]),
        ])
    }))
}

/// Alpha-composite `image` over an opaque white canvas of the same size.
pub fn composite_over_white(image: &RgbaImage) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let alpha = u32::from(a);
        let blend = |c: u8| -> u8 {
            ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8
        };
        Rgba([blend(r), blend(g), blend(b), u8::MAX])
    })
}

/// Map `[0, 255]` to `[-1, 1]`.
#[inline]
pub fn normalize(value: u8) -> f32 {
    f32::from(value) / 127.5 - 1.0
}

/// Map `[-1, 1]` back to `[0, 255]`, clamping then truncating.
#[inline]
pub fn denormalize(value: f32) -> u8 {
    let scaled = (value + 1.0) * 127.5;
    scaled.clamp(0.0, 255.0) as u8
}
