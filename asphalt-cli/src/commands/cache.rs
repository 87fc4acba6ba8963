//! Cache management CLI commands.

use asphalt::cache::{format_age, format_data_size};
use asphalt::config::format_size;
use clap::Subcommand;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Show cached regions, their age and the quota usage
    Stats,
    /// Remove every cached region
    Clear,
    /// Remove entries older than the configured maximum age
    Sweep,
    /// Remove one cached region
    Remove {
        /// Region key (see 'asphalt regions')
        region: String,
    },
}

/// Run a cache subcommand.
pub fn run(runner: &CliRunner, action: CacheAction) -> Result<(), CliError> {
    let cache = runner.open_cache()?;

    match action {
        CacheAction::Stats => {
            let stats = cache.stats()?;
            println!("Region cache: {}", cache.cache_dir().display());
            println!(
                "  Used:    {} of {} ({:.1}%)",
                format_data_size(stats.total_bytes),
                format_size(stats.quota_bytes),
                stats.usage() * 100.0
            );
            println!("  Entries: {}", stats.entry_count());

            if !stats.entries.is_empty() {
                println!();
                println!("  {:<22} {:>9} {:>10} {:>10}", "Region", "Roads", "Size", "Age");
                for entry in &stats.entries {
                    let features = entry
                        .features
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "?".to_string());
                    let age = if entry.expired {
                        format!("{} (expired)", format_age(entry.age))
                    } else {
                        format_age(entry.age)
                    };
                    println!(
                        "  {:<22} {:>9} {:>10} {:>10}",
                        entry.key.as_str(),
                        features,
                        format_data_size(entry.bytes),
                        age
                    );
                }
            }
            Ok(())
        }
        CacheAction::Clear => {
            println!("Clearing region cache at: {}", cache.cache_dir().display());
            let removed = cache.clear()?;
            println!("Removed {} cached region(s)", removed);
            Ok(())
        }
        CacheAction::Sweep => {
            let removed = cache.swept_on_open() + cache.sweep_expired();
            println!(
                "Removed {} expired entr{}",
                removed,
                if removed == 1 { "y" } else { "ies" }
            );
            Ok(())
        }
        CacheAction::Remove { region } => {
            let key = runner.region(&region)?;
            if !cache.has(&key) {
                println!("{} is not cached", key);
                return Ok(());
            }
            cache.remove(&key)?;
            println!("Removed {} from the cache", key);
            Ok(())
        }
    }
}
