//! Load command - shows a region from the cache without touching the network.

use asphalt::coordinator::LoadOutcome;
use asphalt::road::QualityBucket;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the load command.
pub fn run(runner: &CliRunner, region: &str) -> Result<(), CliError> {
    let key = runner.region(region)?;
    let coordinator = runner.coordinator()?;

    let outcome = coordinator.load_region(&key);
    println!("{}", outcome.message());

    if let LoadOutcome::Displayed { counts, .. } = outcome {
        let render = coordinator.render();
        println!("  Drawn lines: {}", render.canvas().len());
        for bucket in QualityBucket::ALL {
            println!("  {:<10} {}", bucket.as_str(), counts.get(bucket));
        }
    }

    Ok(())
}
