// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::imaging_service::ImagingService;
use crate::infrastructure::config::load_service_config;
use crate::infrastructure::imagemagick::ImageMagick;
use crate::infrastructure::swatch_catalog::DirectorySwatchCatalog;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{annotate, health_check, legend, resize};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; RUST_LOG overrides the default filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    // Load configuration
    let config = load_service_config()?;
    tokio::fs::create_dir_all(&config.storage.work_dir).await?;

    // Create adapters (infrastructure layer)
    let imagemagick = Arc::new(ImageMagick::new(
        config.imagemagick.identify.clone(),
        config.imagemagick.convert.clone(),
    ));
    let swatches = Arc::new(DirectorySwatchCatalog::new(config.assets.swatch_dir.clone()));

    // Create services (application layer)
    let imaging_service = ImagingService::new(imagemagick.clone(), imagemagick, swatches);

    // Create application state
    let state = Arc::new(AppState {
        imaging_service,
        work_dir: config.storage.work_dir.clone(),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/api/annotate", post(annotate))
        .route("/api/legend", post(legend))
        .route("/api/resize", post(resize))
        .fallback_service(ServeDir::new(&config.assets.frontend_dir))
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server.socket_addr()?;
    tracing::info!("Starting scale-annotator service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
