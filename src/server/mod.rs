//! HTTP surface: a health probe and the multipart `/process-image` endpoint.
//!
//! The generator is loaded once by the caller and shared read-only through
//! [`AppState`]; each request runs the CPU-bound pipeline on the blocking pool.
pub mod config;
pub mod routes;

use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::model::Generator;

pub use config::ServerConfig;
pub use routes::{AppState, router};

/// Bind `config.bind_addr()` and serve until Ctrl-C.
pub async fn serve(config: ServerConfig, generator: Arc<dyn Generator>) -> Result<()> {
    config.params.validate()?;
    let (width, height) = generator.input_size();
    let state = AppState {
        generator,
        params: config.params,
    };
    let app = router(state, &config)?;

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "Listening on http://{} (model input {}x{}, origins: {})",
        addr,
        width,
        height,
        config.allowed_origins.join(",")
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
