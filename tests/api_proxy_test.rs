//! Integration tests for the image proxy endpoint.

mod common;

use axum::http::StatusCode;
use bitbrush::services::proxy_path;
use common::{assert_ok, assert_status, fixtures, MockHttpServer, TestApp};

#[tokio::test]
async fn test_proxy_requires_url() {
    let app = TestApp::new().await;
    for path in ["/api/proxy-image", "/api/proxy-image?url="] {
        let response = app.get(path).await;
        assert_status(&response, StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "Image URL is required");
    }
}

#[tokio::test]
async fn test_proxy_relays_bytes_and_content_type() {
    let mock = MockHttpServer::start().await;
    let png = fixtures::red_and_white_png();
    mock.mock_image("/out.png", png.clone(), "image/png").await;
    let app = TestApp::new().await;

    let response = app.get(&proxy_path(&mock.url_for("/out.png"))).await;
    assert_ok(&response);
    assert_eq!(response.header("content-type"), Some("image/png"));
    assert_eq!(response.bytes(), png.as_slice());
}

#[tokio::test]
async fn test_proxy_upstream_failure() {
    let mock = MockHttpServer::start().await;
    mock.mock_error("GET", "/missing.png", 404).await;
    let app = TestApp::new().await;

    let response = app.get(&proxy_path(&mock.url_for("/missing.png"))).await;
    assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Failed to proxy image");
}

#[tokio::test]
async fn test_proxy_rejects_non_http_urls() {
    let app = TestApp::new().await;
    let response = app.get(&proxy_path("file:///etc/passwd")).await;
    assert_status(&response, StatusCode::BAD_REQUEST);
}
