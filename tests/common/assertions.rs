//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is a valid PNG image
pub fn assert_png(response: &TestResponse) {
    assert_ok(response);
    assert!(
        response.is_png(),
        "Expected PNG image, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..8.min(response.body.len())]
    );

    assert_eq!(
        response.header("content-type"),
        Some("image/png"),
        "Expected Content-Type: image/png"
    );
}

/// Assert a JSON error body with the given status and message
pub fn assert_json_error(response: &TestResponse, expected: StatusCode, message: &str) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["error"].as_str(),
        Some(message),
        "Full response: {}",
        serde_json::to_string_pretty(&json).unwrap()
    );
}

/// Assert a 256-entry pixel array
pub fn assert_pixel_array(value: &serde_json::Value) -> Vec<String> {
    let pixels: Vec<String> = value
        .as_array()
        .expect("pixels should be an array")
        .iter()
        .map(|v| v.as_str().expect("pixel should be a string").to_string())
        .collect();
    assert_eq!(pixels.len(), 256, "Expected 256 pixels");
    pixels
}
