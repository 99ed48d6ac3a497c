use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::server::AppState;

/// Which provider credentials the server holds
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckEnvResponse {
    pub replicate_key_exists: bool,
    /// First five characters of the Replicate token, or null
    pub replicate_key_first_five_chars: Option<String>,
    pub openai_key_exists: bool,
}

/// Report whether provider keys are configured
#[utoipa::path(
    get,
    path = "/api/check-env",
    responses(
        (status = 200, description = "Credential presence", body = CheckEnvResponse),
    ),
    tag = "Generation"
)]
pub async fn handle_check_env(State(state): State<AppState>) -> Json<CheckEnvResponse> {
    Json(CheckEnvResponse {
        replicate_key_exists: state.credentials.replicate_token.is_some(),
        replicate_key_first_five_chars: state.credentials.replicate_prefix(),
        openai_key_exists: state.credentials.openai_key.is_some(),
    })
}
