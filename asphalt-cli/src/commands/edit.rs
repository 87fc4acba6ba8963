//! Edit command - submits a smoothness correction for one road.
//!
//! The region must already be cached: the road is looked up in the
//! displayed data, written through the OpenStreetMap API, and the local
//! copy updated once the server accepts the change.

use asphalt::coordinator::LoadOutcome;
use asphalt::osm::EditError;
use asphalt::road::smoothness_label;
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the edit command.
pub async fn run(
    runner: &CliRunner,
    region: &str,
    way_id: u64,
    smoothness: &str,
) -> Result<(), CliError> {
    let key = runner.region(region)?;
    let coordinator = runner.coordinator()?;

    if let LoadOutcome::NotCached { region } = coordinator.load_region(&key) {
        return Err(CliError::NotCached(region));
    }

    {
        let mut render = coordinator.render();
        if !render.select(way_id) {
            return Err(CliError::Edit(EditError::UnknownFeature(way_id)));
        }
        if let Some(road) = render.selected() {
            println!("Selected: {}", road.tooltip());
        }
    }

    let client = runner.osm_client()?;
    if client.config().is_dev_server() {
        println!("Using the development API at {}", client.config().api_url);
    }

    let tokens = runner.config().token_source();
    let receipt = coordinator
        .submit_edit(&client, &tokens, way_id, smoothness)
        .await?;
    info!(
        way_id = receipt.way_id,
        changeset_id = receipt.changeset_id,
        "Edit submitted from CLI"
    );

    let previous = receipt.old_smoothness.as_deref().unwrap_or("(none)");
    println!(
        "Updated way {}: {} -> {} (version {}, changeset {})",
        receipt.way_id, previous, receipt.new_smoothness, receipt.new_version, receipt.changeset_id
    );

    let render = coordinator.render();
    if let Some(road) = render.feature(way_id) {
        let label = smoothness_label(&receipt.new_smoothness)
            .map(|(_, english)| english)
            .unwrap_or(receipt.new_smoothness.as_str());
        println!("Now shown as: {} ({})", road.quality_bucket(), label);
    }

    Ok(())
}
