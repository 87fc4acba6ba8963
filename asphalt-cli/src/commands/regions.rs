//! Regions command - lists the selectable voivodeships.

use asphalt::region::REGIONS;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the regions command.
pub fn run(runner: &CliRunner) -> Result<(), CliError> {
    let cache = runner.open_cache()?;

    println!("{:<22} {:<24} {:<8} Cached", "Key", "Name", "Size");
    for region in REGIONS.iter() {
        let cached = if cache.has(&region.key()) { "yes" } else { "" };
        println!(
            "{:<22} {:<24} {:<8} {}",
            region.key, region.name, region.size, cached
        );
    }

    Ok(())
}
