//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api;
use crate::models::{AppConfig, Credentials};
use crate::services::{
    http_client, ArtDescriber, ArtworkLibrary, FileStore, ImageGenerator, ImageProxy,
    KeyValueStore, MemoryStore, OpenAiClient, ReplicateClient,
};

/// Request body cap; uploads arrive base64-encoded in JSON.
pub const MAX_REQUEST_BYTES: usize = 32 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub credentials: Arc<Credentials>,
    pub generator: Arc<dyn ImageGenerator>,
    pub describer: Arc<dyn ArtDescriber>,
    pub proxy: ImageProxy,
    pub library: ArtworkLibrary,
}

/// Create application state from configuration and credentials.
///
/// Uses a file-backed artwork store when `storage.data_dir` is set and an
/// in-memory one otherwise.
pub async fn create_app_state(
    config: AppConfig,
    credentials: Credentials,
) -> anyhow::Result<AppState> {
    let http = http_client()?;

    let store: Arc<dyn KeyValueStore> = match &config.storage.data_dir {
        Some(dir) => Arc::new(
            FileStore::open(dir)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to open artwork store: {e}"))?,
        ),
        None => {
            tracing::info!("No data directory configured, artworks are kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let generator = Arc::new(ReplicateClient::new(
        http.clone(),
        config.replicate.clone(),
        credentials.replicate_token.clone(),
    ));
    let describer = Arc::new(OpenAiClient::new(
        http.clone(),
        config.openai.clone(),
        credentials.openai_key.clone(),
    ));

    Ok(AppState {
        config: Arc::new(config),
        credentials: Arc::new(credentials),
        generator,
        describer,
        proxy: ImageProxy::new(http),
        library: ArtworkLibrary::new(store),
    })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests. CORS is
/// open so the browser editor can call it from its own origin.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Provider proxy endpoints
        .route("/api/generate-images", post(api::handle_generate_images))
        .route("/api/predictions/:id", get(api::handle_prediction))
        .route("/api/proxy-image", get(api::handle_proxy_image))
        .route("/api/check-env", get(api::handle_check_env))
        // Editor endpoints
        .route("/api/rasterize", post(api::handle_rasterize))
        .route("/api/describe", post(api::handle_describe))
        .route(
            "/api/artworks",
            get(api::handle_list_artworks).post(api::handle_save_artwork),
        )
        .route("/api/artworks/:title", get(api::handle_get_artwork))
        .route("/api/artworks/:title/png", get(api::handle_artwork_png))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
