use axum::{extract::State, response::Json};
use base64::Engine;
use pixel_grid::{
    instructions, rasterize, BackgroundThreshold, Grid, SourceBitmap, TransformState,
    DEFAULT_DESCRIPTION, DEFAULT_TITLE,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::server::AppState;

/// Request body for converting an image to a grid
#[derive(Debug, Deserialize, ToSchema)]
pub struct RasterizeRequest {
    /// Image bytes as base64 or a `data:` URI
    pub image: String,
    /// Pan, scale and rotation; fitted to the surface when absent
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub transform: Option<TransformState>,
    /// Background threshold 0-255; 128 keeps everything
    #[serde(default)]
    pub threshold: Option<u8>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RasterizeResponse {
    #[schema(value_type = Vec<String>)]
    pub pixels: Grid,
    /// The grid as instruction text
    pub instructions: String,
    /// Transform actually applied
    #[schema(value_type = Object)]
    pub transform: TransformState,
    pub threshold: u8,
}

/// Strip an optional `data:...;base64,` prefix and decode.
pub fn decode_image_payload(payload: &str) -> Result<Vec<u8>, ApiError> {
    let encoded = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (meta, data) = rest
                .split_once(',')
                .ok_or_else(|| ApiError::BadRequest("Malformed data URI".to_string()))?;
            if !meta.ends_with(";base64") {
                return Err(ApiError::BadRequest(
                    "Only base64 data URIs are supported".to_string(),
                ));
            }
            data
        }
        None => payload,
    };
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| ApiError::BadRequest(format!("Invalid base64 image: {e}")))
}

/// Convert an image to a 16x16 grid
///
/// Renders the image through the transform onto the working surface and
/// samples one point per cell.
#[utoipa::path(
    post,
    path = "/api/rasterize",
    request_body = RasterizeRequest,
    responses(
        (status = 200, description = "Sampled grid", body = RasterizeResponse),
        (status = 400, description = "Image could not be decoded"),
    ),
    tag = "Editor"
)]
pub async fn handle_rasterize(
    State(state): State<AppState>,
    Json(request): Json<RasterizeRequest>,
) -> Result<Json<RasterizeResponse>, ApiError> {
    let bytes = decode_image_payload(&request.image)?;
    let threshold = request
        .threshold
        .map(BackgroundThreshold)
        .unwrap_or(state.config.editor.background_threshold);
    let transform = request.transform;

    let (pixels, transform) = tokio::task::spawn_blocking(move || {
        let source = SourceBitmap::decode(&bytes)?;
        let transform = transform
            .unwrap_or_else(|| TransformState::fitted(source.width(), source.height()));
        Ok::<_, ApiError>((rasterize(&source, &transform, threshold), transform))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Rasterize task failed: {e}")))??;

    let title = request.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let description = request
        .description
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
    tracing::debug!(
        colors = pixels.distinct_colors().len(),
        threshold = threshold.value(),
        "Rasterized image"
    );

    Ok(Json(RasterizeResponse {
        instructions: instructions::encode(&title, &description, &pixels),
        pixels,
        transform,
        threshold: threshold.value(),
    }))
}
