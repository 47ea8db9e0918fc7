//! Pencil-sketch extraction.
//!
//! The chain is fixed: grayscale, invert, 21x21 Gaussian blur, re-invert,
//! divide blend (colour dodge), 3x3 sharpen and a binary threshold at 240.
//! The constants below are part of the output contract; changing any of them
//! changes what the generator sees.
//!
//! Both convolutions use the reflect-101 border policy (`dcb|abcd|cba`).
//! Intermediates are single-channel `u8` planes, rounded and saturated after
//! every step.
use image::{GrayImage, ImageBuffer, Pixel};
use ndarray::{Array2, Zip};

use crate::error::{Error, Result};
use crate::types::PipelineStage;

/// Side of the square Gaussian kernel.
pub const BLUR_KERNEL_SIZE: usize = 21;

/// Identity plus 4-neighbour edge emphasis.
pub const SHARPEN_KERNEL: [[f32; 3]; 3] = [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];

/// Pixels strictly above this become white, everything else black.
pub const SKETCH_THRESHOLD: u8 = 240;

const DIVIDE_SCALE: f32 = 256.0;
const DIVIDE_EPSILON: f32 = 1e-6;

/// Convert a colour image into near-binary line art (values 0 or 255 only).
pub fn to_sketch<P>(image: &ImageBuffer<P, Vec<u8>>) -> Result<GrayImage>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage { width, height });
    }

    let gray = grayscale(image);
    let inverted = invert(&gray);
    let blurred = gaussian_blur(&inverted, BLUR_KERNEL_SIZE, 0.0);
    let inverted_blur = invert(&blurred);
    let dodged = divide_blend(&gray, &inverted_blur);
    let sharpened = convolve3x3(&dodged, &SHARPEN_KERNEL);
    let mask = threshold_binary(&sharpened, SKETCH_THRESHOLD);

    let raw: Vec<u8> = mask.iter().copied().collect();
    GrayImage::from_raw(width, height, raw).ok_or_else(|| {
        Error::processing(
            PipelineStage::Sketched,
            format!("sketch buffer does not fit {}x{}", width, height),
        )
    })
}

/// Rec.601 luma of the first 3 channels, as a (rows, cols) plane.
pub fn grayscale<P>(image: &ImageBuffer<P, Vec<u8>>) -> Array2<u8>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = image.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
        let c = image.get_pixel(col as u32, row as u32).channels();
        let luma = 0.299 * f32::from(c[0]) + 0.587 * f32::from(c[1]) + 0.114 * f32::from(c[2]);
        saturate_u8(luma)
    })
}

pub fn invert(plane: &Array2<u8>) -> Array2<u8> {
    plane.mapv(|v| u8::MAX - v)
}

/// Sigma used when the caller passes `sigma <= 0`.
pub fn derived_sigma(kernel_size: usize) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian weights of odd length `kernel_size`.
pub fn gaussian_kernel(kernel_size: usize, sigma: f32) -> Vec<f32> {
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        derived_sigma(kernel_size)
    };
    let center = (kernel_size as f32 - 1.0) * 0.5;
    let denom = 2.0 * sigma * sigma;

    let mut weights: Vec<f32> = (0..kernel_size)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in weights.iter_mut() {
        *w /= sum;
    }
    weights
}

/// Separable Gaussian blur (horizontal then vertical pass).
pub fn gaussian_blur(plane: &Array2<u8>, kernel_size: usize, sigma: f32) -> Array2<u8> {
    debug_assert!(kernel_size % 2 == 1);
    let kernel = gaussian_kernel(kernel_size, sigma);
    let radius = (kernel_size / 2) as isize;
    let (rows, cols) = plane.dim();

    let mut horizontal = Array2::<f32>::zeros((rows, cols));
    for ((row, col), out) in horizontal.indexed_iter_mut() {
        *out = kernel
            .iter()
            .enumerate()
            .map(|(k, w)| {
                let c = reflect_101(col as isize + k as isize - radius, cols);
                w * f32::from(plane[[row, c]])
            })
            .sum();
    }

    Array2::from_shape_fn((rows, cols), |(row, col)| {
        let acc: f32 = kernel
            .iter()
            .enumerate()
            .map(|(k, w)| {
                let r = reflect_101(row as isize + k as isize - radius, rows);
                w * horizontal[[r, col]]
            })
            .sum();
        saturate_u8(acc)
    })
}

/// Colour dodge: `min(255, gray * 256 / (inverted_blur + eps))`.
pub fn divide_blend(gray: &Array2<u8>, inverted_blur: &Array2<u8>) -> Array2<u8> {
    let mut result = Array2::<u8>::zeros(gray.dim());
    Zip::from(gray)
        .and(inverted_blur)
        .and(&mut result)
        .for_each(|&g, &b, res| {
            let value = f32::from(g) * DIVIDE_SCALE / (f32::from(b) + DIVIDE_EPSILON);
            *res = saturate_u8(value);
        });
    result
}

/// 3x3 correlation with reflect-101 borders.
pub fn convolve3x3(plane: &Array2<u8>, kernel: &[[f32; 3]; 3]) -> Array2<u8> {
    let (rows, cols) = plane.dim();
    Array2::from_shape_fn((rows, cols), |(row, col)| {
        let mut acc = 0.0f32;
        for (ky, kernel_row) in kernel.iter().enumerate() {
            let r = reflect_101(row as isize + ky as isize - 1, rows);
            for (kx, w) in kernel_row.iter().enumerate() {
                if *w == 0.0 {
                    continue;
                }
                let c = reflect_101(col as isize + kx as isize - 1, cols);
                acc += w * f32::from(plane[[r, c]]);
            }
        }
        saturate_u8(acc)
    })
}

pub fn threshold_binary(plane: &Array2<u8>, threshold: u8) -> Array2<u8> {
    plane.mapv(|v| if v > threshold { u8::MAX } else { 0 })
}

/// Mirror an out-of-range index without repeating the edge sample.
/// A 1-long axis always maps to 0.
pub fn reflect_101(index: isize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = index;
    loop {
        if i < 0 {
            i = -i;
        } else if i > last {
            i = 2 * last - i;
        } else {
            return i as usize;
        }
    }
}

#[inline]
fn saturate_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use ndarray::array;

    #[test]
    fn reflect_101_mirrors_without_edge_repeat() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(3, 5), 3);
        assert_eq!(reflect_101(-7, 1), 0);
        // multiple bounces on a short axis
        assert_eq!(reflect_101(-10, 2), 0);
        assert_eq!(reflect_101(11, 2), 1);
    }

    #[test]
    fn derived_sigma_for_21_taps() {
        assert!((derived_sigma(BLUR_KERNEL_SIZE) - 3.5).abs() < 1e-6);
    }

    #[test]
    fn gaussian_kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(BLUR_KERNEL_SIZE, 0.0);
        assert_eq!(k.len(), BLUR_KERNEL_SIZE);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..k.len() / 2 {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-7);
        }
        assert!(k[10] > k[9]);
    }

    #[test]
    fn blur_keeps_constant_planes() {
        let plane = Array2::<u8>::from_elem((9, 4), 77);
        assert_eq!(gaussian_blur(&plane, BLUR_KERNEL_SIZE, 0.0), plane);
    }

    #[test]
    fn sharpen_keeps_constant_planes_and_saturates_edges() {
        let plane = Array2::<u8>::from_elem((3, 3), 200);
        assert_eq!(convolve3x3(&plane, &SHARPEN_KERNEL), plane);

        let spike = array![[0u8, 0, 0], [0, 100, 0], [0, 0, 0]];
        let out = convolve3x3(&spike, &SHARPEN_KERNEL);
        assert_eq!(out[[1, 1]], 255);
        assert_eq!(out[[0, 1]], 0);
    }

    #[test]
    fn divide_blend_guards_zero_denominator() {
        let gray = array![[0u8, 10, 128]];
        let blur = array![[0u8, 0, 255]];
        let out = divide_blend(&gray, &blur);
        assert_eq!(out, array![[0u8, 255, 129]]);
    }

    #[test]
    fn white_page_stays_white() {
        let img = RgbaImage::from_pixel(16, 12, Rgba([255, 255, 255, 255]));
        let sketch = to_sketch(&img).unwrap();
        assert_eq!(sketch.dimensions(), (16, 12));
        assert!(sketch.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn dark_stroke_becomes_black_line() {
        let mut img = RgbaImage::from_pixel(40, 40, Rgba([255, 255, 255, 255]));
        for y in 5..35 {
            for x in 19..21 {
                img.put_pixel(x, y, Rgba([20, 20, 20, 255]));
            }
        }
        let sketch = to_sketch(&img).unwrap();

        assert!(sketch.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert_eq!(sketch.get_pixel(19, 20).0[0], 0);
        assert_eq!(sketch.get_pixel(2, 2).0[0], 255);
    }

    #[test]
    fn output_is_binary_for_noisy_input() {
        let img = RgbaImage::from_fn(33, 17, |x, y| {
            let v = ((x * 37 + y * 91) % 256) as u8;
            Rgba([v, v.wrapping_mul(3), 255 - v, 255])
        });
        let sketch = to_sketch(&img).unwrap();
        assert_eq!(sketch.dimensions(), (33, 17));
        assert!(sketch.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn one_pixel_image() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([30, 30, 30, 255]));
        let sketch = to_sketch(&img).unwrap();
        assert_eq!(sketch.dimensions(), (1, 1));
    }
}
