use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::server::AppState;
use crate::services::ServiceError;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProxyQuery {
    /// Remote image URL
    pub url: Option<String>,
}

/// Relay a remote image
///
/// Lets the editor load generated images from hosts that do not allow
/// cross-origin reads. Errors are plain text.
#[utoipa::path(
    get,
    path = "/api/proxy-image",
    params(ProxyQuery),
    responses(
        (status = 200, description = "Image bytes with the upstream content type"),
        (status = 400, description = "Image URL is required"),
        (status = 500, description = "Failed to proxy image"),
    ),
    tag = "Generation"
)]
pub async fn handle_proxy_image(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Response {
    let Some(url) = query.url.filter(|u| !u.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Image URL is required").into_response();
    };

    match state.proxy.fetch(&url).await {
        Ok(image) => {
            let content_type = image
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string());
            ([(header::CONTENT_TYPE, content_type)], image.bytes).into_response()
        }
        Err(ServiceError::InvalidUrl(e)) => {
            tracing::warn!(url = %url, %e, "Rejected proxy URL");
            (StatusCode::BAD_REQUEST, "Invalid image URL").into_response()
        }
        Err(e) => {
            tracing::error!(url = %url, %e, "Failed to proxy image");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to proxy image").into_response()
        }
    }
}
