use chrono::{DateTime, Utc};
use pixel_grid::Grid;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A saved artwork as stored under `pixelArt_<title>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ArtworkRecord {
    pub title: String,

    pub description: String,

    /// 256 color strings, row-major
    #[schema(value_type = Vec<String>)]
    pub pixels: Grid,

    /// Set by the server on save; absent in records written by older clients
    #[serde(default, rename = "savedAt", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl ArtworkRecord {
    pub fn new(title: impl Into<String>, description: impl Into<String>, pixels: Grid) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            pixels,
            saved_at: None,
        }
    }
}

/// Result of saving an artwork: its title and the thumbnail listed for it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavedArtwork {
    pub title: String,

    /// `data:image/png;base64,...` at 16x16
    pub thumbnail: String,
}
