//! Asphalt CLI - Command-line interface
//!
//! This binary drives the Asphalt library: it lists regions, fetches and
//! caches their roads, reports quality counts and submits smoothness edits.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::cache::CacheAction;
use commands::config::ConfigCommands;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "asphalt")]
#[command(version = asphalt::VERSION)]
#[command(about = "Road surface quality for Polish voivodeships", long_about = None)]
struct Cli {
    /// Enable debug logging (also mirrored to stdout)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the selectable regions and whether they are cached
    Regions,

    /// Show a region from the cache without contacting Overpass
    Load {
        /// Region key (e.g. opolskie)
        region: String,
    },

    /// Fetch a region from Overpass, cache it and show its counts
    ///
    /// Endpoints are tried in order. If all of them fail and an older copy
    /// is cached, that copy is shown instead.
    Refresh {
        /// Region key (e.g. opolskie)
        region: String,
    },

    /// Manage the region cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Correct the smoothness tag of one road in OpenStreetMap
    ///
    /// The region must be cached. Requires an access token in config.ini
    /// or the ASPHALT_OSM_TOKEN environment variable.
    Edit {
        /// Region key the road belongs to
        region: String,

        /// OpenStreetMap way id
        way_id: u64,

        /// New value: excellent, good, intermediate, bad, very_bad,
        /// horrible, very_horrible or impassable
        smoothness: String,
    },

    /// View or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show setup details and probe each Overpass endpoint
    Diagnostics,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Regions => "regions",
            Commands::Load { .. } => "load",
            Commands::Refresh { .. } => "refresh",
            Commands::Cache { .. } => "cache",
            Commands::Edit { .. } => "edit",
            Commands::Config { .. } => "config",
            Commands::Diagnostics => "diagnostics",
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands must work even when the file cannot be parsed.
        Commands::Config { command } => commands::config::run(command),
        command => {
            let runner = CliRunner::with_debug(cli.debug)?;
            runner.log_startup(command.name());
            dispatch(&runner, command).await
        }
    }
}

async fn dispatch(runner: &CliRunner, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Regions => commands::regions::run(runner),
        Commands::Load { region } => commands::load::run(runner, &region),
        Commands::Refresh { region } => commands::refresh::run(runner, &region).await,
        Commands::Cache { action } => commands::cache::run(runner, action),
        Commands::Edit {
            region,
            way_id,
            smoothness,
        } => commands::edit::run(runner, &region, way_id, &smoothness).await,
        Commands::Config { command } => commands::config::run(command),
        Commands::Diagnostics => commands::diagnostics::run(runner).await,
    }
}
