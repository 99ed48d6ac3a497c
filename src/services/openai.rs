//! Title and description suggestions through OpenAI chat completions.

use async_trait::async_trait;
use pixel_grid::{Session, DEFAULT_TITLE};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::models::OpenAiConfig;
use crate::rendering::thumbnail_data_uri;
use crate::services::error::ServiceError;

const FUNCTION_NAME: &str = "set_title_and_description";

const INSTRUCTION: &str =
    "You receive a pixel art image which you must name and provide a creative description for.";

/// A suggested title and one-sentence description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TitleDescription {
    pub title: String,
    pub description: String,
}

/// Trait for naming an image
#[async_trait]
pub trait ArtDescriber: Send + Sync {
    /// Describe the image behind a `data:` URI
    async fn describe(&self, image_url: &str) -> Result<TitleDescription, ServiceError>;
}

pub struct OpenAiClient {
    http: reqwest::Client,
    config: OpenAiConfig,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, config: OpenAiConfig, api_key: Option<String>) -> Self {
        Self {
            http,
            config,
            api_key,
        }
    }

    fn request_body(&self, image_url: &str) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": INSTRUCTION },
                    { "type": "image_url", "image_url": { "url": image_url } },
                ],
            }],
            "functions": [{
                "name": FUNCTION_NAME,
                "description": "Set the title and description for the pixel art",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "title": {
                            "type": "string",
                            "description": "The title for the pixel art. Keep this very simple, preferring a straightforward noun description. You don't need to mention that it's pixel art.",
                        },
                        "description": {
                            "type": "string",
                            "description": "A one sentence creative description of the image. You don't need to mention that it's pixel art.",
                        },
                    },
                    "required": ["title", "description"],
                },
            }],
            "function_call": { "name": FUNCTION_NAME },
        })
    }
}

#[derive(Debug, Deserialize)]
struct Completion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    function_call: Option<FunctionCall>,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

impl Completion {
    fn into_title_description(self) -> Result<TitleDescription, ServiceError> {
        let call = self
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.function_call)
            .ok_or_else(|| ServiceError::InvalidResponse("no function call in completion".into()))?;
        if call.name != FUNCTION_NAME {
            return Err(ServiceError::InvalidResponse(format!(
                "unexpected function {}",
                call.name
            )));
        }
        serde_json::from_str(&call.arguments)
            .map_err(|e| ServiceError::InvalidResponse(format!("bad function arguments: {e}")))
    }
}

#[async_trait]
impl ArtDescriber for OpenAiClient {
    async fn describe(&self, image_url: &str) -> Result<TitleDescription, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ServiceError::MissingCredentials("OpenAI API key"))?;

        let response = self
            .http
            .post(format!(
                "{}/chat/completions",
                self.config.api_base.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&self.request_body(image_url))
            .send()
            .await?;
        let completion: Completion = ServiceError::check(response).await?.json().await?;
        let result = completion.into_title_description()?;

        tracing::info!(title = %result.title, model = %self.config.model, "Generated title");
        Ok(result)
    }
}

/// Ask for a title and description of the session's grid and apply them.
///
/// On failure the session keeps its title and description; the error is
/// logged and the title in effect is returned either way.
pub async fn describe_session(describer: &dyn ArtDescriber, session: &mut Session) -> String {
    let outcome = match thumbnail_data_uri(session.grid()) {
        Ok(uri) => describer.describe(&uri).await,
        Err(e) => Err(ServiceError::InvalidResponse(e.to_string())),
    };
    match outcome {
        Ok(TitleDescription { title, description }) => {
            session.set_title_description(title, description);
        }
        Err(e) => {
            tracing::warn!(%e, "Failed to generate title and description");
        }
    }
    session.title().to_string()
}

/// Title to use for a download, naming the artwork first if it still has
/// the default title.
pub async fn title_for_download(describer: &dyn ArtDescriber, session: &mut Session) -> String {
    if session.title().eq_ignore_ascii_case(DEFAULT_TITLE) {
        describe_session(describer, session).await
    } else {
        session.title().to_string()
    }
}
