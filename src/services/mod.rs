pub mod artwork_store;
pub mod clipboard;
pub mod error;
pub mod image_proxy;
pub mod kv_store;
pub mod openai;
pub mod replicate;

use std::time::Duration;

pub use artwork_store::ArtworkLibrary;
pub use clipboard::{copy_grid, ClipboardError, ClipboardWriter, FileClipboard};
pub use error::ServiceError;
pub use image_proxy::{proxy_path, ImageProxy, ProxiedImage};
pub use kv_store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use openai::{describe_session, title_for_download, ArtDescriber, OpenAiClient, TitleDescription};
pub use replicate::{
    build_prompt, wait_for_result, GenerationRequest, ImageGenerator, PredictionStatus,
    ReplicateClient, VARIANT_COUNT,
};

/// Shared outbound HTTP client for providers and the image proxy.
pub fn http_client() -> Result<reqwest::Client, ServiceError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("bitbrush/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(60))
        .build()?;
    Ok(client)
}
