use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::server::AppState;
use crate::services::{proxy_path, GenerationRequest, PredictionStatus, ServiceError};

/// Request body for starting an image generation
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Variant slot, 0 to 3
    #[serde(default)]
    pub index: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub prediction_id: String,
}

/// Prediction status as reported to the editor
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    /// `succeeded`, `failed`, or the provider's pending status
    pub status: String,
    /// Provider output, present when succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub output: Option<Value>,
    /// Proxy paths for the output URLs, present when succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Start generating a pixel-art image for a title
#[utoipa::path(
    post,
    path = "/api/generate-images",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Prediction started", body = GenerateResponse),
        (status = 400, description = "Replicate API key is missing"),
        (status = 500, description = "Failed to start image generation"),
    ),
    tag = "Generation"
)]
pub async fn handle_generate_images(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    if !state.generator.is_configured() {
        tracing::warn!("Image generation requested without a Replicate API key");
        return Err(ApiError::MissingApiKey("Replicate API key is missing"));
    }

    let request = GenerationRequest {
        title: request.title,
        description: request.description,
        index: request.index,
    };
    let prediction_id = state
        .generator
        .start(&request)
        .await
        .map_err(|e| upstream("Failed to start image generation", e))?;

    Ok(Json(GenerateResponse { prediction_id }))
}

/// Poll a prediction
///
/// A failed prediction is reported with HTTP 400.
#[utoipa::path(
    get,
    path = "/api/predictions/{id}",
    responses(
        (status = 200, description = "Succeeded or still running", body = PredictionResponse),
        (status = 400, description = "Prediction failed", body = PredictionResponse),
        (status = 500, description = "Failed to check prediction status"),
    ),
    params(
        ("id" = String, Path, description = "Prediction id from /api/generate-images"),
    ),
    tag = "Generation"
)]
pub async fn handle_prediction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let status = state
        .generator
        .status(&id)
        .await
        .map_err(|e| upstream("Failed to check prediction status", e))?;

    let proxied: Vec<String> = status
        .output_urls()
        .iter()
        .map(|url| proxy_path(url))
        .collect();

    let response = match status {
        PredictionStatus::Succeeded { output } => Json(PredictionResponse {
            status: "succeeded".to_string(),
            output: Some(output),
            proxied: Some(proxied),
            error: None,
        })
        .into_response(),
        PredictionStatus::Failed { error } => {
            tracing::info!(id = %id, %error, "Prediction failed");
            (
                StatusCode::BAD_REQUEST,
                Json(PredictionResponse {
                    status: "failed".to_string(),
                    output: None,
                    proxied: None,
                    error: Some(error),
                }),
            )
                .into_response()
        }
        PredictionStatus::Pending { status } => Json(PredictionResponse {
            status,
            output: None,
            proxied: None,
            error: None,
        })
        .into_response(),
    };
    Ok(response)
}

fn upstream(message: &'static str, error: ServiceError) -> ApiError {
    ApiError::Upstream {
        message,
        details: error.to_string(),
    }
}
