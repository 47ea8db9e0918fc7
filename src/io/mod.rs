//! I/O layer: decoding uploaded bytes into raster buffers and encoding the
//! final raster into the requested output format.
pub mod decode;
pub use decode::{decode_image, load_image_file};

pub mod writers;
pub use writers::encode_image;
