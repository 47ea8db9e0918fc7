use std::collections::HashMap;
use std::hash::Hash;

use image::{ImageBuffer, Pixel};

use crate::error::{Error, Result};
use crate::types::Color;

/// Most frequent exact pixel value of `image`, as an RGB color.
///
/// Pixels are tallied as full tuples (alpha included when present) in row-major
/// order. Ties go to the value seen first during the scan.
pub fn dominant_color<P>(image: &ImageBuffer<P, Vec<u8>>) -> Result<Color>
where
    P: Pixel<Subpixel = u8> + Eq + Hash,
{
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage { width, height });
    }
    debug_assert!(P::CHANNEL_COUNT >= 3);

    // value -> (count, first seen index)
    let mut tally: HashMap<P, (u64, usize)> = HashMap::new();
    for (index, pixel) in image.pixels().enumerate() {
        tally.entry(*pixel).or_insert((0, index)).0 += 1;
    }

    let (winner, _) = tally
        .iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .ok_or(Error::EmptyImage { width, height })?;

    let channels = winner.channels();
    Ok(Color([channels[0], channels[1], channels[2]]))
}
