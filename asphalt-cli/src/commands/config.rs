//! Configuration management CLI commands.

use asphalt::config::{config_file_path, ConfigFile};
use clap::Subcommand;

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Print the effective configuration (file values over defaults)
    Show,

    /// Write a commented configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
///
/// These commands work before logging is set up, so a broken config file
/// can still be located and replaced.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(),
        ConfigCommands::Init { force } => run_init(force),
    }
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

/// Print the effective configuration as INI.
fn run_show() -> Result<(), CliError> {
    let path = config_file_path();
    let config = ConfigFile::load_from(&path)?;

    if path.exists() {
        println!("; Loaded from {}", path.display());
    } else {
        println!("; No file at {}, showing defaults", path.display());
    }
    print!("{}", redact_token(&config).to_ini_string());
    Ok(())
}

/// Create the configuration file.
fn run_init(force: bool) -> Result<(), CliError> {
    let path = config_file_path();

    if force && path.exists() {
        ConfigFile::default().save_to(&path)?;
        println!("Configuration reset to defaults: {}", path.display());
        return Ok(());
    }

    if ConfigFile::ensure_exists_at(&path)? {
        println!("Created configuration file: {}", path.display());
    } else {
        println!("Configuration file already exists: {}", path.display());
        println!("Use --force to overwrite it with defaults.");
    }
    Ok(())
}

/// Copy of `config` with the access token masked.
fn redact_token(config: &ConfigFile) -> ConfigFile {
    let mut shown = config.clone();
    if shown.osm.access_token.is_some() {
        shown.osm.access_token = Some("********".to_string());
    }
    shown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_token() {
        let mut config = ConfigFile::default();
        assert!(redact_token(&config).osm.access_token.is_none());

        config.osm.access_token = Some("real-secret".to_string());
        let shown = redact_token(&config).to_ini_string();
        assert!(!shown.contains("real-secret"));
        assert!(shown.contains("access_token = ********"));
    }
}
