//! Image generation through the Replicate predictions API.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::models::ReplicateConfig;
use crate::services::error::ServiceError;

/// Number of variants the editor requests per title.
pub const VARIANT_COUNT: u32 = 4;

/// What to generate.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub title: String,
    pub description: String,
    /// Which of the [`VARIANT_COUNT`] slots this fills
    pub index: u32,
}

/// Prompt sent to the model. An empty description is left out.
pub fn build_prompt(title: &str, description: &str) -> String {
    let description = if description.is_empty() {
        String::new()
    } else {
        format!(". {description}")
    };
    format!(
        "A 16x16 pixel iconic representation of {title}{description}. \
         Image with black transparent background in the style of BITBRUSH."
    )
}

/// Current state of a prediction.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionStatus {
    /// Finished; `output` is the provider's output value, usually a list
    /// of image URLs
    Succeeded { output: Value },
    Failed { error: String },
    /// Still queued or running; carries the provider's status word
    Pending { status: String },
}

impl PredictionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PredictionStatus::Pending { .. })
    }

    /// Image URLs of a succeeded prediction.
    pub fn output_urls(&self) -> Vec<String> {
        match self {
            PredictionStatus::Succeeded { output } => output_urls(output),
            _ => Vec::new(),
        }
    }
}

fn output_urls(output: &Value) -> Vec<String> {
    match output {
        Value::String(url) => vec![url.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: String,
    #[serde(default)]
    output: Value,
    #[serde(default)]
    error: Option<Value>,
}

impl From<Prediction> for PredictionStatus {
    fn from(p: Prediction) -> Self {
        let error_text = || match &p.error {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };
        match p.status.as_str() {
            "succeeded" => PredictionStatus::Succeeded {
                output: p.output.clone(),
            },
            "failed" => PredictionStatus::Failed {
                error: error_text().unwrap_or_else(|| "Image generation failed".to_string()),
            },
            "canceled" => PredictionStatus::Failed {
                error: error_text().unwrap_or_else(|| "Image generation was canceled".to_string()),
            },
            _ => PredictionStatus::Pending {
                status: p.status.clone(),
            },
        }
    }
}

/// Trait for starting and polling image generation jobs
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Start a job, returning its id
    async fn start(&self, request: &GenerationRequest) -> Result<String, ServiceError>;

    async fn status(&self, id: &str) -> Result<PredictionStatus, ServiceError>;

    /// Whether credentials are present
    fn is_configured(&self) -> bool;
}

pub struct ReplicateClient {
    http: reqwest::Client,
    config: ReplicateConfig,
    token: Option<String>,
}

impl ReplicateClient {
    pub fn new(http: reqwest::Client, config: ReplicateConfig, token: Option<String>) -> Self {
        Self {
            http,
            config,
            token,
        }
    }

    pub fn config(&self) -> &ReplicateConfig {
        &self.config
    }

    fn token(&self) -> Result<&str, ServiceError> {
        self.token
            .as_deref()
            .ok_or(ServiceError::MissingCredentials("Replicate API key"))
    }

    fn predictions_url(&self) -> String {
        format!("{}/predictions", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl ImageGenerator for ReplicateClient {
    async fn start(&self, request: &GenerationRequest) -> Result<String, ServiceError> {
        let token = self.token()?;
        tracing::info!(
            title = %request.title,
            index = request.index,
            "Starting image generation"
        );

        let body = json!({
            "version": self.config.model_version,
            "input": {
                "prompt": build_prompt(&request.title, &request.description),
                "model": "dev",
                "num_outputs": 1,
                "guidance_scale": self.config.guidance_scale,
                "num_inference_steps": self.config.num_inference_steps,
                "disable_safety_checker": true,
            },
        });

        let response = self
            .http
            .post(self.predictions_url())
            .header("Authorization", format!("Token {token}"))
            .json(&body)
            .send()
            .await?;
        let prediction: Prediction = ServiceError::check(response).await?.json().await?;

        tracing::debug!(id = %prediction.id, status = %prediction.status, "Prediction created");
        Ok(prediction.id)
    }

    async fn status(&self, id: &str) -> Result<PredictionStatus, ServiceError> {
        let token = self.token()?;
        let response = self
            .http
            .get(format!(
                "{}/{}",
                self.predictions_url(),
                utf8_percent_encode(id, NON_ALPHANUMERIC)
            ))
            .header("Authorization", format!("Token {token}"))
            .send()
            .await?;
        let prediction: Prediction = ServiceError::check(response).await?.json().await?;
        tracing::debug!(id = %id, status = %prediction.status, "Prediction status");
        Ok(prediction.into())
    }

    fn is_configured(&self) -> bool {
        self.token.is_some()
    }
}

/// Poll a job until it reaches a terminal state.
///
/// Returns the output URLs on success. Gives up with
/// [`ServiceError::TimedOut`] after `max_polls` non-terminal answers.
pub async fn wait_for_result(
    generator: &dyn ImageGenerator,
    id: &str,
    interval: Duration,
    max_polls: u32,
) -> Result<Vec<String>, ServiceError> {
    for poll in 0..max_polls {
        match generator.status(id).await? {
            PredictionStatus::Succeeded { output } => return Ok(output_urls(&output)),
            PredictionStatus::Failed { error } => return Err(ServiceError::PredictionFailed(error)),
            PredictionStatus::Pending { status } => {
                tracing::debug!(id = %id, poll, status = %status, "Prediction pending");
                tokio::time::sleep(interval).await;
            }
        }
    }
    Err(ServiceError::TimedOut {
        id: id.to_string(),
        polls: max_polls,
    })
}
