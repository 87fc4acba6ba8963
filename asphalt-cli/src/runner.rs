//! CLI runner for common setup and operations.
//!
//! Encapsulates logging initialization and construction of the library
//! components so command handlers only deal with their own output.

use crate::error::CliError;
use asphalt::cache::RegionCache;
use asphalt::config::{ConfigFile, DEFAULT_LOG_FILE_NAME};
use asphalt::coordinator::Coordinator;
use asphalt::logging::{init_logging, LoggingGuard};
use asphalt::osm::OsmApiClient;
use asphalt::overpass::{RegionFetcher, ReqwestTransport};
use asphalt::region::{find_region, RegionKey};
use asphalt::render::{RecordingCanvas, RenderEngine};
use std::path::PathBuf;
use tracing::info;

/// The coordinator as assembled for command-line use.
pub type CliCoordinator = Coordinator<RegionFetcher<ReqwestTransport>, RecordingCanvas>;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner with optional debug logging.
    ///
    /// Logs go to the configured file. In debug mode they are mirrored to
    /// stdout as well.
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string());

        let logging_guard = init_logging(&log_dir, &log_file, debug_mode, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("Asphalt v{}", asphalt::VERSION);
        info!("Asphalt CLI: {} command", command);
    }

    /// Resolve a region slug against the static table.
    pub fn region(&self, key: &str) -> Result<RegionKey, CliError> {
        let key = key.trim().to_lowercase();
        find_region(&key)
            .map(|r| r.key())
            .ok_or(CliError::UnknownRegion(key))
    }

    /// Open the region cache, sweeping expired entries.
    pub fn open_cache(&self) -> Result<RegionCache, CliError> {
        Ok(RegionCache::open(self.config.cache_config())?)
    }

    /// Overpass fetcher with the configured endpoints and retry policy.
    pub fn fetcher(&self) -> Result<RegionFetcher<ReqwestTransport>, CliError> {
        let config = self.config.fetcher_config();
        let transport = ReqwestTransport::new(&config.user_agent)
            .map_err(|e| CliError::HttpClient(e.to_string()))?;
        Ok(RegionFetcher::new(transport, config))
    }

    /// Fetcher, cache and a headless render engine wired together.
    pub fn coordinator(&self) -> Result<CliCoordinator, CliError> {
        let engine = RenderEngine::new(RecordingCanvas::new(), self.config.render_config());
        Ok(Coordinator::new(
            self.fetcher()?,
            Box::new(self.open_cache()?),
            engine,
        ))
    }

    /// Client for the configured OpenStreetMap API.
    pub fn osm_client(&self) -> Result<OsmApiClient, CliError> {
        Ok(OsmApiClient::connect(self.config.osm_api_config())?)
    }
}
