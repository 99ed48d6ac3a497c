//! Integration tests for saving, loading and exporting artworks.

mod common;

use axum::http::StatusCode;
use bitbrush::models::{AppConfig, Credentials};
use common::{assert_ok, assert_png, assert_status, fixtures, TestApp};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_list_starts_empty() {
    let app = TestApp::new().await;
    let response = app.get("/api/artworks").await;
    assert_ok(&response);
    assert_eq!(response.json::<serde_json::Value>(), json!({}));
}

#[tokio::test]
async fn test_save_then_list_and_load() {
    let app = TestApp::new().await;
    let thumbnail = app
        .save_artwork("Heart", "A small red heart.", &fixtures::heart_pixels())
        .await;
    assert!(thumbnail.starts_with("data:image/png;base64,"));

    let list: serde_json::Value = app.get("/api/artworks").await.json();
    assert_eq!(list["Heart"], thumbnail);

    let response = app.get("/api/artworks/Heart").await;
    assert_ok(&response);
    let record: serde_json::Value = response.json();
    assert_eq!(record["title"], "Heart");
    assert_eq!(record["description"], "A small red heart.");
    assert_eq!(record["pixels"], json!(fixtures::heart_pixels()));
    assert!(record["savedAt"].is_string());
}

#[tokio::test]
async fn test_titles_with_spaces_round_trip() {
    let app = TestApp::new().await;
    app.save_artwork("Red Heart", "", &fixtures::heart_pixels()).await;
    assert_ok(&app.get("/api/artworks/Red%20Heart").await);
}

#[tokio::test]
async fn test_resave_overwrites() {
    let app = TestApp::new().await;
    app.save_artwork("Heart", "first", &fixtures::heart_pixels()).await;
    app.save_artwork("Heart", "second", &fixtures::heart_pixels()).await;

    let list: serde_json::Value = app.get("/api/artworks").await.json();
    assert_eq!(list.as_object().unwrap().len(), 1);
    let record: serde_json::Value = app.get("/api/artworks/Heart").await.json();
    assert_eq!(record["description"], "second");
}

#[tokio::test]
async fn test_save_rejects_empty_title_and_bad_grid() {
    let app = TestApp::new().await;
    let response = app
        .post_json(
            "/api/artworks",
            &json!({"title": "  ", "description": "", "pixels": fixtures::heart_pixels()}),
        )
        .await;
    assert_status(&response, StatusCode::BAD_REQUEST);

    let response = app
        .post_json(
            "/api/artworks",
            &json!({"title": "Short", "description": "", "pixels": vec!["transparent"; 3]}),
        )
        .await;
    assert!(response.status.is_client_error());
}

#[tokio::test]
async fn test_missing_artwork_is_404() {
    let app = TestApp::new().await;
    assert_status(&app.get("/api/artworks/Nope").await, StatusCode::NOT_FOUND);
    assert_status(&app.get("/api/artworks/Nope/png").await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_png_export_sizes() {
    let app = TestApp::new().await;
    app.save_artwork("Heart", "", &fixtures::heart_pixels()).await;

    let response = app.get("/api/artworks/Heart/png").await;
    assert_png(&response);
    assert_eq!(response.png_size(), (16, 16));

    for size in [32, 64, 96, 128, 256] {
        let response = app.get(&format!("/api/artworks/Heart/png?size={size}")).await;
        assert_png(&response);
        assert_eq!(response.png_size(), (size, size));
    }

    let response = app.get("/api/artworks/Heart/png?size=17").await;
    assert_status(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_png_preview_is_twice_as_wide() {
    let app = TestApp::new().await;
    app.save_artwork("Heart", "", &fixtures::heart_pixels()).await;

    let response = app.get("/api/artworks/Heart/png?size=64&preview=true").await;
    assert_png(&response);
    assert_eq!(response.png_size(), (128, 64));
}

#[tokio::test]
async fn test_png_download_names_attachment() {
    let app = TestApp::new().await;
    app.save_artwork("Red Heart!", "", &fixtures::heart_pixels()).await;

    let response = app.get("/api/artworks/Red%20Heart%21/png?download=true").await;
    assert_png(&response);
    assert_eq!(
        response.header("content-disposition"),
        Some("attachment; filename=\"red_heart_.png\"")
    );

    let inline = app.get("/api/artworks/Red%20Heart%21/png").await;
    assert!(inline.header("content-disposition").is_none());
}

#[tokio::test]
async fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = || {
        let mut config = AppConfig::default();
        config.storage.data_dir = Some(dir.path().to_path_buf());
        config
    };

    let first = TestApp::with_config(config(), Credentials::default()).await;
    first
        .save_artwork("Heart", "kept", &fixtures::heart_pixels())
        .await;
    drop(first);

    let second = TestApp::with_config(config(), Credentials::default()).await;
    let record: serde_json::Value = second.get("/api/artworks/Heart").await.json();
    assert_eq!(record["description"], "kept");
}
