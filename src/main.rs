use anyhow::Result;
use clap::Parser;
use tracing::info;

use rootrelay::app::RelayApp;
use rootrelay::config::BaseConfig;
use rootrelay::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    info!("Starting rootrelay");

    let config = BaseConfig::parse();
    info!(
        "Configuration: storage_path={}, replicas={}, expiry_window_secs={}",
        config.storage_path, config.replicas, config.expiry_window_secs
    );

    let app = RelayApp::initialize(config)?;
    app.run().await?;

    info!("Rootrelay shutdown complete");
    Ok(())
}
