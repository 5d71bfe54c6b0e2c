//! Settings for suggestion fields.
//!
//! [`SuggestConfig`] is read from TOML. Every key is optional:
//!
//! ```toml
//! base_url = "http://127.0.0.1:5000"
//! suggestions_path = "/api/suggestions"
//! catalog_path = "/api/autocomplete"
//! debounce_ms = 150
//! request_timeout_ms = 10000
//! min_chars = 1
//! max_visible_items = 7
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use insight_net::{HttpClient, NetworkError};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::suggest::{CatalogSource, ControllerSettings, HttpSuggestionSource};

/// Errors raised while loading or applying a [`SuggestConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// The file that was read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    /// An endpoint URL could not be built.
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
    /// The HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    Network(#[from] NetworkError),
}

/// Suggestion subsystem settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    /// Dashboard server origin.
    pub base_url: String,
    /// Path of the per-keystroke suggestions endpoint.
    pub suggestions_path: String,
    /// Path of the prefetched autocomplete catalog.
    pub catalog_path: String,
    /// Debounce window in milliseconds; 0 disables debouncing.
    pub debounce_ms: u64,
    /// Per-lookup HTTP timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Minimum normalized query length.
    pub min_chars: usize,
    /// Dropdown scroll window size.
    pub max_visible_items: usize,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            suggestions_path: "/api/suggestions".to_string(),
            catalog_path: "/api/autocomplete".to_string(),
            debounce_ms: 150,
            request_timeout_ms: 10_000,
            min_chars: 1,
            max_visible_items: 7,
        }
    }
}

impl SuggestConfig {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// The suggestions endpoint.
    pub fn suggestions_url(&self) -> Result<Url, ConfigError> {
        Ok(Url::parse(&self.base_url)?.join(&self.suggestions_path)?)
    }

    /// The catalog endpoint.
    pub fn catalog_url(&self) -> Result<Url, ConfigError> {
        Ok(Url::parse(&self.base_url)?.join(&self.catalog_path)?)
    }

    /// The debounce window.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The per-lookup HTTP timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// An HTTP client honoring the configured timeout.
    pub fn http_client(&self) -> Result<HttpClient, ConfigError> {
        Ok(HttpClient::builder().timeout(self.request_timeout()).build()?)
    }

    /// Controller settings derived from this config.
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings::default()
            .with_debounce(self.debounce())
            .with_min_chars(self.min_chars)
            .with_max_visible_items(self.max_visible_items)
    }

    /// A source asking the suggestions endpoint.
    pub fn http_source(&self) -> Result<HttpSuggestionSource, ConfigError> {
        Ok(HttpSuggestionSource::new(self.http_client()?, self.suggestions_url()?))
    }

    /// A source answering from the prefetched catalog.
    pub fn catalog_source(&self) -> Result<CatalogSource, ConfigError> {
        Ok(CatalogSource::new(self.http_client()?, self.catalog_url()?))
    }
}
