//! End-to-end flows across several endpoints.

mod common;

use bitbrush::services::{wait_for_result, GenerationRequest, ImageGenerator, VARIANT_COUNT};
use common::{assert_ok, assert_pixel_array, assert_png, fixtures, MockHttpServer, TestApp};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

/// Generate, poll, fetch through the proxy and rasterize.
#[tokio::test]
async fn test_generate_to_grid_flow() {
    let mock = MockHttpServer::start().await;
    mock.mock_prediction_start("r8_token", "pred-9").await;
    mock.mock_prediction_succeeded("pred-9", &mock.url_for("/outputs/cat.png"))
        .await;
    mock.mock_image("/outputs/cat.png", fixtures::red_and_white_png(), "image/png")
        .await;
    let app = TestApp::with_providers(&mock, Some("r8_token"), None).await;

    let started: serde_json::Value = app
        .post_json("/api/generate-images", &json!({"title": "Cat", "index": 0}))
        .await
        .json();
    let id = started["predictionId"].as_str().unwrap();

    let prediction: serde_json::Value = app.get(&format!("/api/predictions/{id}")).await.json();
    assert_eq!(prediction["status"], "succeeded");
    let proxied = prediction["proxied"][0].as_str().unwrap();

    let image = app.get(proxied).await;
    assert_ok(&image);
    assert!(image.is_png());

    let grid: serde_json::Value = app
        .post_json(
            "/api/rasterize",
            &json!({"image": fixtures::base64(image.bytes()), "title": "Cat"}),
        )
        .await
        .json();
    let pixels = assert_pixel_array(&grid["pixels"]);
    assert_eq!(pixels[0], fixtures::RED);
}

/// Name a grid, save it under that name and download it.
#[tokio::test]
async fn test_describe_save_export_flow() {
    let mock = MockHttpServer::start().await;
    mock.mock_openai_title("Heart", "A small red heart.").await;
    let app = TestApp::with_providers(&mock, None, Some("sk-test")).await;

    let suggestion: serde_json::Value = app
        .post_json("/api/describe", &json!({"pixels": fixtures::heart_pixels()}))
        .await
        .json();
    let title = suggestion["title"].as_str().unwrap();
    let description = suggestion["description"].as_str().unwrap();

    app.save_artwork(title, description, &fixtures::heart_pixels())
        .await;

    let png = app
        .get(&format!("/api/artworks/{title}/png?size=256&download=true"))
        .await;
    assert_png(&png);
    assert_eq!(png.png_size(), (256, 256));
    assert_eq!(
        png.header("content-disposition"),
        Some("attachment; filename=\"heart.png\"")
    );
}

/// The generator held in app state can be driven directly, as the CLI does.
#[tokio::test]
async fn test_state_generator_polls_all_variants() {
    let mock = MockHttpServer::start().await;
    mock.mock_prediction_start("r8_token", "same").await;
    mock.mock_prediction_succeeded("same", "https://replicate.delivery/a.webp")
        .await;
    let app = TestApp::with_providers(&mock, Some("r8_token"), None).await;

    for index in 0..VARIANT_COUNT {
        let request = GenerationRequest {
            title: "Cat".into(),
            description: String::new(),
            index,
        };
        let id = app.state.generator.start(&request).await.unwrap();
        let urls = wait_for_result(
            app.state.generator.as_ref(),
            &id,
            Duration::from_millis(1),
            5,
        )
        .await
        .unwrap();
        assert_eq!(urls, vec!["https://replicate.delivery/a.webp".to_string()]);
    }
}
