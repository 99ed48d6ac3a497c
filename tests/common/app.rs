//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use bitbrush::models::{AppConfig, Credentials};
use bitbrush::server::{build_router, create_app_state, AppState};

use super::mock_server::MockHttpServer;

/// Test application with router and direct access to state
pub struct TestApp {
    router: axum::Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a test application with default config, no credentials and
    /// an in-memory artwork store
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default(), Credentials::default()).await
    }

    /// Create a test application whose providers point at a mock server
    pub async fn with_providers(
        mock: &MockHttpServer,
        replicate_token: Option<&str>,
        openai_key: Option<&str>,
    ) -> Self {
        let mut config = AppConfig::default();
        config.replicate.api_base = mock.url();
        config.replicate.poll_interval_ms = 1;
        config.openai.api_base = mock.url();
        let credentials = Credentials {
            replicate_token: replicate_token.map(str::to_string),
            openai_key: openai_key.map(str::to_string),
        };
        Self::with_config(config, credentials).await
    }

    pub async fn with_config(config: AppConfig, credentials: Credentials) -> Self {
        let state = create_app_state(config, credentials)
            .await
            .expect("Failed to create app state");
        let router = build_router(state.clone());
        Self { router, state }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Save an artwork through the API and return its thumbnail
    pub async fn save_artwork(&self, title: &str, description: &str, pixels: &[String]) -> String {
        let body = serde_json::json!({
            "title": title,
            "description": description,
            "pixels": pixels,
        });
        let response = self.post_json("/api/artworks", &body).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        let json: serde_json::Value = response.json();
        json["thumbnail"].as_str().unwrap().to_string()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }

    /// Decoded PNG dimensions
    pub fn png_size(&self) -> (u32, u32) {
        let decoder = png::Decoder::new(std::io::Cursor::new(&self.body));
        let reader = decoder.read_info().expect("Invalid PNG");
        let info = reader.info();
        (info.width, info.height)
    }
}
