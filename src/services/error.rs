use thiserror::Error;

/// Failure talking to an external AI provider or image host.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} is not configured")]
    MissingCredentials(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    #[error("Prediction {id} did not finish after {polls} polls")]
    TimedOut { id: String, polls: u32 },

    #[error("Image too large: more than {max} bytes")]
    TooLarge { max: usize },
}

impl ServiceError {
    /// Turn a non-success response into [`ServiceError::Status`], keeping
    /// the body for diagnostics.
    pub(crate) async fn check(response: reqwest::Response) -> Result<reqwest::Response, Self> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ServiceError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
