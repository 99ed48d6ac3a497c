use pixel_grid::BackgroundThreshold;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub replicate: ReplicateConfig,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Image generation provider settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReplicateConfig {
    pub api_base: String,

    /// Model version hash passed to the predictions endpoint
    pub model_version: String,

    pub guidance_scale: f32,

    pub num_inference_steps: u32,

    /// Delay between prediction status polls
    pub poll_interval_ms: u64,

    /// Give up waiting for a prediction after this many polls
    pub max_polls: u32,
}

impl Default for ReplicateConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.replicate.com/v1".to_string(),
            model_version: "83bd408fc5d2988389c1c1bcdde75545dc0f4ad42aae83082991edcf75a815b2"
                .to_string(),
            guidance_scale: 3.5,
            num_inference_steps: 28,
            poll_interval_ms: 1000,
            max_polls: 120,
        }
    }
}

/// Title/description provider settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_base: String,
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct EditorConfig {
    /// Threshold used when no request overrides it
    pub background_threshold: BackgroundThreshold,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the artwork store. In-memory when unset.
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from `CONFIG_FILE` and apply environment overrides.
    pub fn from_env() -> Self {
        let path = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
        let mut config = Self::load(path.as_deref());
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Load configuration from a YAML file, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file set, using defaults");
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse YAML content, falling back to defaults on error.
    pub fn parse(content: &str) -> Self {
        match serde_yaml::from_str::<Self>(content) {
            Ok(config) => {
                tracing::info!(
                    model = %config.openai.model,
                    threshold = config.editor.background_threshold.value(),
                    data_dir = ?config.storage.data_dir,
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                tracing::warn!(%e, "Failed to parse config, using defaults");
                Self::default()
            }
        }
    }

    /// Apply `DATA_DIR` and `OPENAI_MODEL` overrides from a variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("DATA_DIR").filter(|v| !v.is_empty()) {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(model) = lookup("OPENAI_MODEL").filter(|v| !v.is_empty()) {
            self.openai.model = model;
        }
    }
}

/// Provider secrets. Only ever read from the environment.
#[derive(Clone, Default)]
pub struct Credentials {
    pub replicate_token: Option<String>,
    pub openai_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            replicate_token: non_empty("REPLICATE_API_TOKEN")
                .or_else(|| non_empty("VITE_REPLICATE_API_TOKEN")),
            openai_key: non_empty("OPENAI_API_KEY"),
        }
    }

    /// First five characters of the Replicate token, for diagnostics.
    pub fn replicate_prefix(&self) -> Option<String> {
        self.replicate_token
            .as_deref()
            .map(|token| token.chars().take(5).collect())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("replicate_token", &redact(&self.replicate_token))
            .field("openai_key", &redact(&self.openai_key))
            .finish()
    }
}
