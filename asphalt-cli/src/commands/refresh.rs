//! Refresh command - fetches a region from Overpass, caches and displays it.

use asphalt::coordinator::RefreshOutcome;
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the refresh command.
pub async fn run(runner: &CliRunner, region: &str) -> Result<(), CliError> {
    let key = runner.region(region)?;
    let coordinator = runner.coordinator()?;

    let endpoints = &coordinator.source().config().endpoints;
    println!(
        "Fetching {} ({} endpoint{})...",
        key,
        endpoints.len(),
        if endpoints.len() == 1 { "" } else { "s" }
    );

    let outcome = coordinator.refresh_region(&key).await;
    info!(region = %key, success = outcome.is_success(), "Refresh finished");

    match outcome {
        RefreshOutcome::Failed { region, kind, .. } => Err(CliError::Refresh { region, kind }),
        outcome => {
            println!("{}", outcome.message());
            if let RefreshOutcome::StaleFallback { .. } = outcome {
                println!("The data shown may be out of date.");
            }
            Ok(())
        }
    }
}
