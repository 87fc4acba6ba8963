//! Configuration file handling for ~/.asphalt/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//! Settings structs live in [`super::settings`], defaults in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub use super::settings::*;

use crate::cache::CacheConfig;
use crate::osm::{OsmApiConfig, StaticToken};
use crate::overpass::FetcherConfig;
use crate::render::RenderConfig;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.asphalt/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        std::fs::write(path, self.to_ini_string())
            .map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// The commented INI text `save_to` writes.
    pub fn to_ini_string(&self) -> String {
        super::writer::to_config_string(self)
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        Self::ensure_exists_at(&path)?;
        Ok(path)
    }

    /// Create a default config file at `path` if missing. Returns whether it was created.
    pub fn ensure_exists_at(path: &Path) -> Result<bool, ConfigFileError> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        Ok(true)
    }

    /// Fetcher settings from `[overpass]`.
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig::default()
            .with_endpoints(self.overpass.endpoints.iter().cloned())
            .with_attempts_per_endpoint(self.overpass.attempts_per_endpoint)
            .with_retry_delay(Duration::from_millis(self.overpass.retry_delay_ms))
            .with_request_timeout(Duration::from_secs(self.overpass.request_timeout_secs))
            .with_server_timeout_secs(self.overpass.server_timeout_secs)
    }

    /// Cache settings from `[cache]`.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::default()
            .with_cache_dir(self.cache.directory.clone())
            .with_max_age_days(self.cache.max_age_days)
            .with_quota(self.cache.quota)
    }

    /// Render thresholds from `[map]`.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::default()
            .with_min_visible_zoom(self.map.min_visible_zoom)
            .with_fade(self.map.fade_start_zoom, self.map.fade_span)
            .with_min_opacity(self.map.min_opacity)
    }

    /// API client settings from `[osm]`.
    pub fn osm_api_config(&self) -> OsmApiConfig {
        OsmApiConfig::default().with_api_url(self.osm.api_url.clone())
    }

    /// Access token from `[osm]`, else the environment.
    pub fn token_source(&self) -> StaticToken {
        StaticToken::resolve(self.osm.access_token.as_deref())
    }
}

/// Get the path to the config directory (~/.asphalt).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".asphalt")
}

/// Get the path to the config file (~/.asphalt/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::AccessTokenSource;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.overpass.endpoints.len(), 3);
        assert_eq!(config.overpass.attempts_per_endpoint, 2);
        assert_eq!(config.overpass.request_timeout_secs, 95);
        assert_eq!(config.cache.max_age_days, 3);
        assert_eq!(config.cache.quota, 256 * 1024 * 1024);
        assert_eq!(config.map.min_visible_zoom, 7.0);
        assert!(config.osm.access_token.is_none());
        assert!(config.logging.file.ends_with(".asphalt/asphalt.log"));
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_ensure_exists_at_creates_once() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        assert!(ConfigFile::ensure_exists_at(&config_path).unwrap());
        assert!(config_path.exists());
        assert!(!ConfigFile::ensure_exists_at(&config_path).unwrap());
    }

    #[test]
    fn test_component_configs() {
        let mut config = ConfigFile::default();
        config.overpass.endpoints = vec!["https://one.test/api/interpreter".to_string()];
        config.overpass.retry_delay_ms = 250;
        config.cache.max_age_days = 7;
        config.map.fade_span = 2.0;
        config.osm.api_url = "https://api.openstreetmap.org/".to_string();
        config.osm.access_token = Some("abc".to_string());

        let fetcher = config.fetcher_config();
        assert_eq!(fetcher.endpoints, vec!["https://one.test/api/interpreter".to_string()]);
        assert_eq!(fetcher.retry_delay, Duration::from_millis(250));
        assert!(fetcher.validate().is_ok());

        assert_eq!(config.cache_config().max_age, Duration::from_secs(7 * 24 * 3600));
        assert_eq!(config.render_config().fade_span, 2.0);
        assert_eq!(config.osm_api_config().api_url, "https://api.openstreetmap.org");
        assert!(config.token_source().is_authenticated());
    }
}
