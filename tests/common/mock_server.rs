//! Mock provider server for Replicate, OpenAI and image hosts.

use serde_json::json;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Wrapper around wiremock MockServer with convenience methods
pub struct MockHttpServer {
    pub server: MockServer,
}

impl MockHttpServer {
    /// Start a new mock HTTP server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the base URL of the mock server
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Get URL for a specific path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.server.uri(), path)
    }

    /// Mock `POST /predictions` returning a new prediction id
    pub async fn mock_prediction_start(&self, token: &str, id: &str) {
        Mock::given(method("POST"))
            .and(path("/predictions"))
            .and(header("authorization", format!("Token {token}").as_str()))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"id": id, "status": "starting"})),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock `GET /predictions/{id}` with a fixed prediction body
    pub async fn mock_prediction(&self, id: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!("/predictions/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mock a succeeded prediction whose output is one image URL
    pub async fn mock_prediction_succeeded(&self, id: &str, image_url: &str) {
        self.mock_prediction(
            id,
            json!({"id": id, "status": "succeeded", "output": [image_url]}),
        )
        .await;
    }

    /// Mock a chat completion answering with a title and description
    pub async fn mock_openai_title(&self, title: &str, description: &str) {
        let arguments = json!({"title": title, "description": description}).to_string();
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "function_call": {
                            "name": "set_title_and_description",
                            "arguments": arguments,
                        }
                    }
                }]
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a GET endpoint returning image bytes
    pub async fn mock_image(&self, endpoint: &str, bytes: Vec<u8>, content_type: &str) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(bytes)
                    .insert_header("content-type", content_type),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock an endpoint that returns an error status
    pub async fn mock_error(&self, http_method: &str, endpoint: &str, status: u16) {
        Mock::given(method(http_method))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream error"))
            .mount(&self.server)
            .await;
    }
}
