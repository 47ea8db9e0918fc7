use std::path::Path;

use image::{ColorType, Rgb, RgbImage};
use lustre::{
    Error, IdentityGenerator, OutputFormat, PipelineParams, process_file_to_path,
    sketch_file_to_path,
};

fn write_photo(path: &Path) {
    RgbImage::from_fn(120, 90, |x, y| {
        if (40..80).contains(&x) && (30..60).contains(&y) {
            Rgb([30, 40, 50])
        } else {
            Rgb([230, 200, 150])
        }
    })
    .save(path)
    .unwrap();
}

#[test]
fn format_follows_output_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.png");
    let output = dir.path().join("design.png");
    write_photo(&input);

    let generator = IdentityGenerator::new(40, 40);
    let processed =
        process_file_to_path(&input, &output, None, &generator, &PipelineParams::default())
            .unwrap();
    assert_eq!(processed.format, OutputFormat::PNG);

    let written = image::open(&output).unwrap();
    assert_eq!((written.width(), written.height()), (40, 40));
    assert_eq!(written.color(), ColorType::Rgba8);
}

#[test]
fn explicit_format_wins_over_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.png");
    let output = dir.path().join("design.out");
    write_photo(&input);

    let generator = IdentityGenerator::new(24, 24);
    let params = PipelineParams {
        jpeg_quality: 95,
        ..PipelineParams::default()
    };
    let processed = process_file_to_path(
        &input,
        &output,
        Some(OutputFormat::JPEG),
        &generator,
        &params,
    )
    .unwrap();
    assert_eq!(processed.format, OutputFormat::JPEG);

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[test]
fn sketch_file_is_binary_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.png");
    let output = dir.path().join("sketch.png");
    write_photo(&input);

    sketch_file_to_path(&input, &output, &PipelineParams::default()).unwrap();

    let written = image::open(&output).unwrap();
    assert_eq!(written.color(), ColorType::L8);
    let luma = written.to_luma8();
    assert_eq!(luma.dimensions(), (120, 90));
    assert!(luma.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let generator = IdentityGenerator::new(8, 8);
    let err = process_file_to_path(
        &dir.path().join("nope.png"),
        &dir.path().join("out.jpg"),
        None,
        &generator,
        &PipelineParams::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
