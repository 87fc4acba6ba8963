//! Diagnostics command - outputs setup and endpoint status for bug reports.

use asphalt::config::config_file_path;
use asphalt::osm::AccessTokenSource;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the diagnostics command.
pub async fn run(runner: &CliRunner) -> Result<(), CliError> {
    let config = runner.config();

    println!("Asphalt v{}", asphalt::VERSION);
    println!();
    println!("Configuration");
    println!("  File:      {}", config_file_path().display());
    println!("  Cache:     {}", config.cache.directory.display());
    println!("  Log:       {}", config.logging.file.display());
    println!("  OSM API:   {}", config.osm.api_url);
    println!(
        "  OSM token: {}",
        if config.token_source().is_authenticated() {
            "configured"
        } else {
            "not set"
        }
    );
    println!();

    println!("Overpass endpoints");
    let fetcher = runner.fetcher()?;
    for status in fetcher.endpoint_status().await {
        let code = status
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  [{}] {} ({}) {}",
            if status.available { "ok" } else { "!!" },
            status.endpoint,
            code,
            status.message
        );
    }

    Ok(())
}
