use clap::{Args, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

use lustre::OutputFormat;
use lustre::server::config::{DEFAULT_ALLOWED_ORIGINS, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT};

#[derive(Parser)]
#[command(name = "lustre", version, about = "LUSTRE sketch-to-design CLI")]
pub struct CliArgs {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value_t = false)]
    pub log: bool,

    /// JSON preset with pipeline parameters; explicit flags override it
    #[arg(long, global = true)]
    pub params: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP service
    Serve(ServeArgs),
    /// Run the full pipeline on one image file
    Process(ProcessArgs),
    /// Only whiten the background and extract the sketch (no model needed)
    Sketch(SketchArgs),
}

#[derive(Args)]
pub struct ModelArgs {
    /// Generator exported to ONNX with an NHWC [1, H, W, 3] input
    #[arg(long, env = "MODEL_PATH", default_value = "generator.onnx")]
    pub model: PathBuf,

    /// Input size as WIDTHxHEIGHT, required when the model has dynamic dimensions
    #[arg(long, env = "LUSTRE_INPUT_SIZE")]
    pub input_size: Option<String>,
}

#[derive(Args)]
pub struct PipelineArgs {
    /// Color distance at or below which a pixel counts as background
    #[arg(long, env = "LUSTRE_BACKGROUND_THRESHOLD")]
    pub background_threshold: Option<u32>,

    /// JPEG output quality (1-100)
    #[arg(long, env = "LUSTRE_JPEG_QUALITY")]
    pub jpeg_quality: Option<u8>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Address to bind
    #[arg(long, env = "LUSTRE_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to bind
    #[arg(long, env = "LUSTRE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Comma-separated list of origins allowed by CORS
    #[arg(long, env = "ALLOWED_ORIGINS", default_value = DEFAULT_ALLOWED_ORIGINS)]
    pub allowed_origins: String,

    /// Maximum accepted request body in bytes
    #[arg(long, env = "LUSTRE_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

#[derive(Args)]
pub struct ProcessArgs {
    /// Input image (any decodable raster format)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output filename; defaults to `<input-stem>_design.<ext>` next to the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (jpeg, png, webp or avif); defaults to the output extension, then JPEG
    #[arg(short = 'f', long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Args)]
pub struct SketchArgs {
    /// Input image (any decodable raster format)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output PNG filename
    #[arg(short, long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}
