use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::ApiError;
use crate::models::{ArtworkRecord, SavedArtwork};
use crate::rendering::thumbnail_data_uri;
use crate::services::kv_store::{KeyValueStore, StoreError};

/// Key of the title to thumbnail map.
pub const SAVED_INDEX_KEY: &str = "savedPixelArts";

/// Key of one artwork record.
pub fn record_key(title: &str) -> String {
    format!("pixelArt_{title}")
}

/// Saved artworks over a flat key-value store.
///
/// Layout matches what the browser editor keeps in local storage: a
/// thumbnail index under [`SAVED_INDEX_KEY`] and one record per title.
/// The two writes are not transactional, but saves through clones of one
/// library are serialized so the index never loses an entry.
#[derive(Clone)]
pub struct ArtworkLibrary {
    store: Arc<dyn KeyValueStore>,
    save_lock: Arc<Mutex<()>>,
}

impl ArtworkLibrary {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Save or overwrite an artwork, returning the listed thumbnail.
    pub async fn save(&self, mut record: ArtworkRecord) -> Result<SavedArtwork, ApiError> {
        let thumbnail = thumbnail_data_uri(&record.pixels)?;

        let _guard = self.save_lock.lock().await;
        let mut index = self.thumbnails().await?;
        index.insert(record.title.clone(), thumbnail.clone());
        self.store.set(SAVED_INDEX_KEY, to_json(&index)?).await?;

        record.saved_at = Some(chrono::Utc::now());
        self.store
            .set(&record_key(&record.title), to_json(&record)?)
            .await?;

        tracing::info!(title = %record.title, artworks = index.len(), "Saved artwork");
        Ok(SavedArtwork {
            title: record.title,
            thumbnail,
        })
    }

    pub async fn load(&self, title: &str) -> Result<Option<ArtworkRecord>, ApiError> {
        let key = record_key(title);
        let Some(json) = self.store.get(&key).await? else {
            return Ok(None);
        };
        let record = serde_json::from_str(&json)
            .map_err(|source| StoreError::InvalidValue { key, source })?;
        Ok(Some(record))
    }

    /// Title to thumbnail data URI, sorted by title.
    pub async fn thumbnails(&self) -> Result<BTreeMap<String, String>, ApiError> {
        let Some(json) = self.store.get(SAVED_INDEX_KEY).await? else {
            return Ok(BTreeMap::new());
        };
        let index = serde_json::from_str(&json).map_err(|source| StoreError::InvalidValue {
            key: SAVED_INDEX_KEY.to_string(),
            source,
        })?;
        Ok(index)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Internal(e.to_string()))
}
