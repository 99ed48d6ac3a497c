use axum::{extract::State, response::Json};
use pixel_grid::Grid;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::rendering::thumbnail_data_uri;
use crate::server::AppState;
use crate::services::TitleDescription;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DescribeRequest {
    #[schema(value_type = Vec<String>)]
    pub pixels: Grid,
}

/// Suggest a title and description for a grid
#[utoipa::path(
    post,
    path = "/api/describe",
    request_body = DescribeRequest,
    responses(
        (status = 200, description = "Suggestion", body = TitleDescription),
        (status = 502, description = "Naming service failed"),
    ),
    tag = "Editor"
)]
pub async fn handle_describe(
    State(state): State<AppState>,
    Json(request): Json<DescribeRequest>,
) -> Result<Json<TitleDescription>, ApiError> {
    let image_url = thumbnail_data_uri(&request.pixels)?;
    let suggestion = state.describer.describe(&image_url).await?;
    Ok(Json(suggestion))
}
