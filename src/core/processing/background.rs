use image::{ImageBuffer, Pixel};

use crate::types::Color;

/// Replace every pixel within `threshold` of `target` with opaque white.
///
/// Distance is the sum of absolute differences over the first 3 channels.
/// Dimensions and channel count are untouched; returns the number of pixels replaced.
pub fn normalize_background<P>(
    image: &mut ImageBuffer<P, Vec<u8>>,
    target: Color,
    threshold: u32,
) -> usize
where
    P: Pixel<Subpixel = u8>,
{
    debug_assert!(P::CHANNEL_COUNT >= 3);

    let mut replaced = 0;
    for pixel in image.pixels_mut() {
        let channels = pixel.channels_mut();
        if target.manhattan_distance(channels) <= threshold {
            channels.fill(u8::MAX);
            replaced += 1;
        }
    }
    replaced
}
