pub mod artwork;
pub mod config;

pub use artwork::{ArtworkRecord, SavedArtwork};
pub use config::{AppConfig, Credentials, EditorConfig, OpenAiConfig, ReplicateConfig, StorageConfig};
