use jpeg_encoder::{ColorType, Encoder};

use crate::error::{Error, Result};

fn jpeg_error<E: std::fmt::Display>(e: E) -> Error {
    Error::Encode {
        format: "JPEG".to_string(),
        message: e.to_string(),
    }
}

/// Encode interleaved RGB bytes as a baseline JPEG held in memory.
pub fn encode_rgb_jpeg(cols: u32, rows: u32, rgb_data: &[u8], quality: u8) -> Result<Vec<u8>> {
    let width = u16::try_from(cols).map_err(|_| jpeg_error(format!("width {cols} exceeds 65535")))?;
    let height =
        u16::try_from(rows).map_err(|_| jpeg_error(format!("height {rows} exceeds 65535")))?;

    let mut buffer = Vec::new();
    let encoder = Encoder::new(&mut buffer, quality);
    encoder
        .encode(rgb_data, width, height, ColorType::Rgb)
        .map_err(jpeg_error)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_jfif_markers() {
        let data = vec![128u8; 8 * 4 * 3];
        let bytes = encode_rgb_jpeg(8, 4, &data, 75).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn oversized_width_is_an_encode_error() {
        assert!(matches!(
            encode_rgb_jpeg(70_000, 1, &[], 75),
            Err(Error::Encode { .. })
        ));
    }
}
