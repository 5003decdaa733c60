use tracing::info;

use clash_harvest::core::config::{self, HarvestConfig};
use clash_harvest::harvest::Harvester;

/// `--offline` (alias `--debug`) swaps the two page fetches for local
/// fixture files. Resource downloads still hit the network.
fn offline_from_args() -> bool {
    std::env::args().any(|a| a == "--offline" || a == "--debug")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let offline = offline_from_args();
    let file_config = config::load_file_config();
    let harvest_config = HarvestConfig::resolve(&file_config, offline);

    info!("Starting clash-harvest");
    if offline {
        info!("Offline mode: reading page fixtures instead of the network");
    }

    let harvester = Harvester::new(harvest_config);
    let outcome = harvester.run().await;
    info!("Run finished: {:?}", outcome);
    Ok(())
}
