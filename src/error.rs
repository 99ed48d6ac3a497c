use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pixel_grid::DecodeError;
use serde_json::json;
use thiserror::Error;

use crate::rendering::ExportError;
use crate::services::{ServiceError, StoreError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    MissingApiKey(&'static str),

    #[error("Artwork not found: {0}")]
    ArtworkNotFound(String),

    #[error("Not found")]
    NotFound,

    #[error("Image decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Upstream provider failure reported with a fixed message plus details.
    #[error("{message}")]
    Upstream { message: &'static str, details: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::MissingApiKey(_) | ApiError::Decode(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ArtworkNotFound(_) | ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Export(ExportError::UnsupportedSize(_)) => StatusCode::BAD_REQUEST,
            ApiError::Export(_) | ApiError::Store(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Service(_) => StatusCode::BAD_GATEWAY,
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = match &self {
            ApiError::Upstream { message, details } => json!({
                "status": status.as_u16(),
                "error": message,
                "details": details,
            }),
            _ => json!({
                "status": status.as_u16(),
                "error": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
