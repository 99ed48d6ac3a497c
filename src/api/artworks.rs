use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::collections::BTreeMap;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::models::{ArtworkRecord, SavedArtwork};
use crate::rendering::{download_filename, render_png, render_preview_png, ExportSize};
use crate::server::AppState;

/// List saved artworks
///
/// Returns a map of title to 16x16 thumbnail data URI.
#[utoipa::path(
    get,
    path = "/api/artworks",
    responses(
        (status = 200, description = "Title to thumbnail map", body = BTreeMap<String, String>),
    ),
    tag = "Artworks"
)]
pub async fn handle_list_artworks(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, String>>, ApiError> {
    Ok(Json(state.library.thumbnails().await?))
}

/// Save an artwork
///
/// Overwrites any artwork with the same title.
#[utoipa::path(
    post,
    path = "/api/artworks",
    request_body = ArtworkRecord,
    responses(
        (status = 200, description = "Saved", body = SavedArtwork),
        (status = 400, description = "Empty title"),
    ),
    tag = "Artworks"
)]
pub async fn handle_save_artwork(
    State(state): State<AppState>,
    Json(record): Json<ArtworkRecord>,
) -> Result<Json<SavedArtwork>, ApiError> {
    if record.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title must not be empty".to_string()));
    }
    Ok(Json(state.library.save(record).await?))
}

/// Load an artwork
#[utoipa::path(
    get,
    path = "/api/artworks/{title}",
    responses(
        (status = 200, description = "Artwork", body = ArtworkRecord),
        (status = 404, description = "No artwork with that title"),
    ),
    params(
        ("title" = String, Path, description = "Artwork title"),
    ),
    tag = "Artworks"
)]
pub async fn handle_get_artwork(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<ArtworkRecord>, ApiError> {
    state
        .library
        .load(&title)
        .await?
        .map(Json)
        .ok_or(ApiError::ArtworkNotFound(title))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PngQuery {
    /// Output size: 16, 32, 64, 96, 128 or 256 (default 16)
    pub size: Option<u32>,
    /// Render the light/dark preview tile instead of a transparent image
    #[serde(default)]
    pub preview: bool,
    /// Send as an attachment named after the title
    #[serde(default)]
    pub download: bool,
}

/// Export an artwork as PNG
#[utoipa::path(
    get,
    path = "/api/artworks/{title}/png",
    params(
        ("title" = String, Path, description = "Artwork title"),
        PngQuery,
    ),
    responses(
        (status = 200, description = "PNG image", content_type = "image/png"),
        (status = 400, description = "Unsupported size"),
        (status = 404, description = "No artwork with that title"),
    ),
    tag = "Artworks"
)]
pub async fn handle_artwork_png(
    State(state): State<AppState>,
    Path(title): Path<String>,
    Query(query): Query<PngQuery>,
) -> Result<Response, ApiError> {
    let size = ExportSize::new(query.size.unwrap_or(16))?;
    let record = state
        .library
        .load(&title)
        .await?
        .ok_or_else(|| ApiError::ArtworkNotFound(title.clone()))?;

    let png = if query.preview {
        render_preview_png(&record.pixels, size)?
    } else {
        render_png(&record.pixels, size)?
    };

    let mut response = ([(header::CONTENT_TYPE, "image/png")], png).into_response();
    if query.download {
        let disposition = format!("attachment; filename=\"{}\"", download_filename(&title));
        if let Ok(value) = disposition.parse() {
            response
                .headers_mut()
                .insert(header::CONTENT_DISPOSITION, value);
        }
    }
    Ok(response)
}
