//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use asphalt::cache::CacheError;
use asphalt::config::ConfigFileError;
use asphalt::coordinator::FailureKind;
use asphalt::osm::{EditError, TOKEN_ENV_VAR};
use asphalt::region::RegionKey;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Region key not in the static table
    UnknownRegion(String),
    /// Failed to open or manage the cache
    Cache(CacheError),
    /// Failed to create an HTTP client
    HttpClient(String),
    /// Refresh failed and nothing cached was available
    Refresh { region: RegionKey, kind: FailureKind },
    /// Edit requested for a region that is not cached
    NotCached(RegionKey),
    /// Edit rejected locally or by the API
    Edit(EditError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::UnknownRegion(_) => {
                eprintln!();
                eprintln!("Run 'asphalt regions' to list the available regions.");
            }
            CliError::NotCached(region) => {
                eprintln!();
                eprintln!("Fetch the region first with: asphalt refresh {}", region);
            }
            CliError::Refresh { kind, .. } => {
                eprintln!();
                eprintln!("{}", kind.message());
                if matches!(kind, FailureKind::Timeout | FailureKind::GatewayTimeout) {
                    eprintln!("Large regions can take several minutes on a busy server.");
                    eprintln!("Check server load with: asphalt diagnostics");
                }
            }
            CliError::Edit(EditError::Unauthenticated) => {
                eprintln!();
                eprintln!("Edits need an OpenStreetMap access token. Either:");
                eprintln!("  1. Set access_token in the [osm] section of config.ini");
                eprintln!("  2. Export {}=<token>", TOKEN_ENV_VAR);
            }
            CliError::Edit(e) if e.is_conflict() => {
                eprintln!();
                eprintln!("The way was changed by someone else. Refresh the region and try again.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::UnknownRegion(key) => write!(f, "Unknown region '{}'", key),
            CliError::Cache(e) => write!(f, "Cache error: {}", e),
            CliError::HttpClient(msg) => write!(f, "Failed to create HTTP client: {}", msg),
            CliError::Refresh { region, kind } => {
                write!(f, "Failed to refresh {} ({})", region, kind)
            }
            CliError::NotCached(region) => write!(f, "No cached data for {}", region),
            CliError::Edit(e) => write!(f, "Edit failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Cache(e) => Some(e),
            CliError::Edit(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<CacheError> for CliError {
    fn from(e: CacheError) -> Self {
        CliError::Cache(e)
    }
}

impl From<EditError> for CliError {
    fn from(e: EditError) -> Self {
        CliError::Edit(e)
    }
}
