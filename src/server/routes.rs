use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

use crate::api::{ProcessedImage, process_upload};
use crate::core::params::PipelineParams;
use crate::error::{Error, ErrorKind, Result};
use crate::model::Generator;

use super::config::ServerConfig;

/// Multipart field carrying the uploaded image.
pub const UPLOAD_FIELD: &str = "imageInput";
/// Multipart field carrying the requested output format.
pub const FORMAT_FIELD: &str = "output_format";

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn Generator>,
    pub params: PipelineParams,
}

/// Build the service router: `GET /health` and `POST /process-image`.
pub fn router(state: AppState, config: &ServerConfig) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.origin_headers()?))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::any());

    Ok(Router::new()
        .route("/health", get(health))
        .route("/process-image", post(process_image).layer(cors))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(state))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK", "message": "ML Service is running" }))
}

/// JSON error body with a status derived from the error kind.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match (&self.0, self.0.kind()) {
            (Error::MissingUpload, _) => (StatusCode::BAD_REQUEST, "No image uploaded".to_string()),
            (Error::UnsupportedFormat { .. }, _) => (
                StatusCode::BAD_REQUEST,
                "Unsupported output format. Use JPEG, PNG, WEBP, or AVIF.".to_string(),
            ),
            (Error::UndecodableImage(_), _) => {
                (StatusCode::BAD_REQUEST, "Invalid image file.".to_string())
            }
            (e, ErrorKind::InvalidInput) => (StatusCode::BAD_REQUEST, e.to_string()),
            (e, ErrorKind::ProcessingFailure | ErrorKind::ModelFailure) => {
                error!("Request failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("An internal error occurred: {}", e),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn multipart_error(e: MultipartError) -> Response {
    warn!("Malformed multipart body: {}", e);
    (e.status(), Json(json!({ "error": e.body_text() }))).into_response()
}

async fn process_image(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut upload = None;
    let mut output_format: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return multipart_error(e),
        };
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(UPLOAD_FIELD) => match field.bytes().await {
                Ok(bytes) => upload = Some(bytes),
                Err(e) => return multipart_error(e),
            },
            Some(FORMAT_FIELD) => match field.text().await {
                Ok(text) => output_format = Some(text),
                Err(e) => return multipart_error(e),
            },
            _ => {}
        }
    }

    let Some(bytes) = upload else {
        return ApiError(Error::MissingUpload).into_response();
    };
    info!(
        "Received upload of {} bytes (output_format={:?})",
        bytes.len(),
        output_format
    );

    let joined = tokio::task::spawn_blocking(move || {
        process_upload(
            &bytes,
            output_format.as_deref(),
            state.generator.as_ref(),
            &state.params,
        )
    })
    .await;

    match joined {
        Ok(Ok(processed)) => image_response(processed),
        Ok(Err(e)) => ApiError(e).into_response(),
        Err(e) => ApiError(Error::TaskFailed(e.to_string())).into_response(),
    }
}

fn image_response(processed: ProcessedImage) -> Response {
    info!(
        "Returning {}x{} {} ({} bytes)",
        processed.width,
        processed.height,
        processed.format,
        processed.bytes.len()
    );
    (
        [(header::CONTENT_TYPE, processed.mime_type())],
        processed.bytes,
    )
        .into_response()
}
