#![doc = r#"
LUSTRE — a sketch-to-design image transformation service.

This crate turns a product photograph or a rough drawing into a generated design:
the dominant (background) color is keyed out to white, the result is reduced to a
binary pencil sketch, and the sketch is fed to a fixed-shape image-to-image generator.
It powers the LUSTRE CLI and HTTP service, and can be embedded in your own Rust
applications.

Stability
---------
The public library API is experimental in initial releases and may evolve.
Breaking changes can occur.

Requirements
------------
- Rust 2024 edition toolchain.
- With the default `onnx` feature, an ONNX Runtime that `ort` can download or link.

Add dependency
--------------
```toml
[dependencies]
lustre = { version = "0.1", features = ["full"] }
```

Quick start: process a file with a model
----------------------------------------
```rust,no_run
use std::path::Path;
use lustre::{process_file_to_path, OnnxGenerator, OutputFormat, PipelineParams};

fn main() -> lustre::Result<()> {
    let generator = OnnxGenerator::load(Path::new("generator.onnx"), None)?;
    let processed = process_file_to_path(
        Path::new("photo.jpg"),
        Path::new("design.png"),
        Some(OutputFormat::PNG),
        &generator,
        &PipelineParams::default(),
    )?;
    println!("{}x{} {}", processed.width, processed.height, processed.mime_type());
    Ok(())
}
```

Process in-memory bytes
-----------------------
Any [`Generator`] works; [`IdentityGenerator`] returns the sketch unchanged, which
is handy for dry runs.

```rust,no_run
use lustre::{process_upload, IdentityGenerator, PipelineParams};

fn main() -> lustre::Result<()> {
    let upload = std::fs::read("photo.jpg")?;
    let generator = IdentityGenerator::new(256, 256);
    let result = process_upload(&upload, Some("webp"), &generator, &PipelineParams::default())?;
    std::fs::write("design.webp", &result.bytes)?;
    Ok(())
}
```

Preprocessing only
------------------
```rust,no_run
use std::path::Path;
use lustre::{sketch_file_to_path, PipelineParams};

fn main() -> lustre::Result<()> {
    let sketch = sketch_file_to_path(
        Path::new("photo.jpg"),
        Path::new("sketch.png"),
        &PipelineParams::default(),
    )?;
    assert!(sketch.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    Ok(())
}
```

Error handling
--------------
All public functions return `lustre::Result<T>`. [`Error::kind`] groups failures into
rejected input, processing failures and model failures; the HTTP service maps the first
to `400` and the others to `500`.

```rust,no_run
use lustre::{process_upload, ErrorKind, IdentityGenerator, PipelineParams};

fn main() {
    let generator = IdentityGenerator::new(256, 256);
    match process_upload(b"not an image", None, &generator, &PipelineParams::default()) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::InvalidInput => eprintln!("bad upload: {e}"),
        Err(e) => eprintln!("internal error: {e}"),
    }
}
```

Feature flags
-------------
- `onnx` (default): the ONNX Runtime backed [`OnnxGenerator`].
- `full`: enables a complete feature set for typical end-to-end workflows.

Useful modules
--------------
- [`api`] — high-level, ergonomic entry points.
- [`core`] — color sampling, background keying, sketch extraction and tensor conversion.
- [`model`] — the [`Generator`] boundary.
- [`server`] — the axum HTTP service.
- [`io`] — decoding and encoding.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod model;
pub mod server;
pub mod types;

// Curated public API surface
// Types
pub use core::params::PipelineParams;
pub use error::{Error, ErrorKind, Result};
pub use types::{Color, OutputFormat, PipelineStage};

// Model boundary
pub use model::{Generator, IdentityGenerator};
#[cfg(feature = "onnx")]
pub use model::OnnxGenerator;

// Codecs
pub use io::{decode_image, encode_image, load_image_file};

// High-level API re-exports
pub use api::{
    ProcessedImage, parse_output_format, process_bytes, process_file_to_path, process_image,
    process_upload, sketch_bytes, sketch_file_to_path,
};
