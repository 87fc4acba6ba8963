//! User configuration for Asphalt.
//!
//! Settings are read from `~/.asphalt/config.ini`. Every key is optional;
//! missing keys fall back to the component defaults, and each section maps
//! onto one component's config struct:
//!
//! | Section      | Component config                                  |
//! |--------------|---------------------------------------------------|
//! | `[overpass]` | [`FetcherConfig`](crate::overpass::FetcherConfig) |
//! | `[cache]`    | [`CacheConfig`](crate::cache::CacheConfig)        |
//! | `[map]`      | [`RenderConfig`](crate::render::RenderConfig)     |
//! | `[osm]`      | [`OsmApiConfig`](crate::osm::OsmApiConfig)        |
//!
//! # Example
//!
//! ```no_run
//! use asphalt::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let fetcher = config.fetcher_config();
//! assert!(!fetcher.endpoints.is_empty());
//! # Ok::<(), asphalt::config::ConfigFileError>(())
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod size;
mod writer;

pub use defaults::DEFAULT_LOG_FILE_NAME;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    CacheSettings, ConfigFile, LoggingSettings, MapSettings, OsmSettings, OverpassSettings,
};
pub use size::{format_size, parse_size, SizeParseError};
