use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use lustre::api::{process_file_to_path, sketch_file_to_path};
use lustre::model::Generator;
use lustre::server::{ServerConfig, config::parse_origins};
use lustre::{OutputFormat, PipelineParams};

use super::args::{CliArgs, Command, ModelArgs, PipelineArgs, ProcessArgs, ServeArgs, SketchArgs};
use super::errors::AppError;

fn init_logging(debug: bool) {
    let default = if debug { "lustre=debug" } else { "lustre=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Start from the preset (or defaults) and apply explicit overrides.
fn resolve_params(preset: Option<&Path>, overrides: &PipelineArgs) -> Result<PipelineParams, AppError> {
    let mut params = match preset {
        Some(path) => PipelineParams::from_json_file(path)?,
        None => PipelineParams::default(),
    };
    if let Some(threshold) = overrides.background_threshold {
        params.background_threshold = threshold;
    }
    if let Some(quality) = overrides.jpeg_quality {
        params.jpeg_quality = quality;
    }
    params.validate()?;
    Ok(params)
}

#[cfg(feature = "onnx")]
fn load_generator(args: &ModelArgs) -> Result<Arc<dyn Generator>, AppError> {
    if !args.model.exists() {
        return Err(AppError::MissingModel {
            path: args.model.clone(),
        });
    }
    let size_override = args
        .input_size
        .as_deref()
        .map(lustre::model::parse_size)
        .transpose()?;
    let generator = lustre::model::OnnxGenerator::load(&args.model, size_override)?;
    Ok(Arc::new(generator))
}

#[cfg(not(feature = "onnx"))]
fn load_generator(_args: &ModelArgs) -> Result<Arc<dyn Generator>, AppError> {
    Err(AppError::BackendUnavailable)
}

fn run_serve(args: ServeArgs, params: PipelineParams) -> Result<(), AppError> {
    let generator = load_generator(&args.model)?;
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        allowed_origins: parse_origins(&args.allowed_origins),
        max_upload_bytes: args.max_upload_bytes,
        params,
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(lustre::server::serve(config, generator))?;
    Ok(())
}

/// `<dir>/<input-stem>_design.<ext>` next to the input.
fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_design.{}", stem, format.extension()))
}

fn run_process(args: ProcessArgs, params: PipelineParams) -> Result<(), AppError> {
    if !args.input.exists() {
        return Err(AppError::MissingInput { path: args.input });
    }
    let (output, format) = match args.output {
        Some(output) => (output, args.format),
        None => {
            let format = args.format.unwrap_or_default();
            (default_output_path(&args.input, format), Some(format))
        }
    };

    let generator = load_generator(&args.model)?;
    let processed =
        process_file_to_path(&args.input, &output, format, generator.as_ref(), &params)?;
    info!(
        "Processed {:?} -> {:?} ({} bytes)",
        args.input,
        output,
        processed.bytes.len()
    );
    Ok(())
}

fn run_sketch(args: SketchArgs, params: PipelineParams) -> Result<(), AppError> {
    if !args.input.exists() {
        return Err(AppError::MissingInput { path: args.input });
    }
    sketch_file_to_path(&args.input, &args.output, &params)?;
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(args.log);

    let preset = args.params.as_deref();
    match args.command {
        Command::Serve(serve) => {
            let params = resolve_params(preset, &serve.pipeline)?;
            run_serve(serve, params)?;
        }
        Command::Process(process) => {
            let params = resolve_params(preset, &process.pipeline)?;
            run_process(process, params)?;
        }
        Command::Sketch(sketch) => {
            let params = resolve_params(preset, &sketch.pipeline)?;
            run_sketch(sketch, params)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_overrides() -> PipelineArgs {
        PipelineArgs {
            background_threshold: None,
            jpeg_quality: None,
        }
    }

    #[test]
    fn overrides_win_over_preset() {
        let mut preset = tempfile::NamedTempFile::new().unwrap();
        write!(preset, r#"{{"background_threshold": 50, "jpeg_quality": 90}}"#).unwrap();

        let params = resolve_params(Some(preset.path()), &no_overrides()).unwrap();
        assert_eq!(params.background_threshold, 50);
        assert_eq!(params.jpeg_quality, 90);

        let overrides = PipelineArgs {
            background_threshold: Some(10),
            jpeg_quality: None,
        };
        let params = resolve_params(Some(preset.path()), &overrides).unwrap();
        assert_eq!(params.background_threshold, 10);
        assert_eq!(params.jpeg_quality, 90);
    }

    #[test]
    fn rejects_out_of_range_quality() {
        let overrides = PipelineArgs {
            background_threshold: None,
            jpeg_quality: Some(0),
        };
        assert!(resolve_params(None, &overrides).is_err());
    }

    #[test]
    fn default_output_uses_format_extension() {
        assert_eq!(
            default_output_path(Path::new("/tmp/in/photo.png"), OutputFormat::WEBP),
            PathBuf::from("/tmp/in/photo_design.webp")
        );
        assert_eq!(
            default_output_path(Path::new("shoe.jpeg"), OutputFormat::JPEG),
            PathBuf::from("shoe_design.jpg")
        );
        // Same format as the input must not overwrite it.
        assert_eq!(
            default_output_path(Path::new("sketch.png"), OutputFormat::PNG),
            PathBuf::from("sketch_design.png")
        );
    }

    #[test]
    fn sketch_requires_existing_input() {
        let dir = tempfile::tempdir().unwrap();
        let args = SketchArgs {
            input: dir.path().join("missing.png"),
            output: dir.path().join("out.png"),
            pipeline: no_overrides(),
        };
        let err = run_sketch(args, PipelineParams::default()).unwrap_err();
        assert!(matches!(err, AppError::MissingInput { .. }));
    }
}
