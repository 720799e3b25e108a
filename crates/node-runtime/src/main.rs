//! # Chain-Cron Node
//!
//! Dev-mode node: one process, in-memory state, blocks on a timer.
//!
//! ## Startup Sequence
//!
//! 1. Install telemetry (log subscriber, metrics registry)
//! 2. Load configuration from the environment
//! 3. Build the handler stacks and verify migrations
//! 4. Apply genesis (file from `CC_GENESIS`, else the dev genesis)
//! 5. Produce blocks until Ctrl+C

use anyhow::{Context, Result};
use cc_07_cron::TickerConfig;
use chain_telemetry::{init_telemetry, TelemetryConfig};
use shared_types::UnixTime;
use tracing::{info, warn};

use node_runtime::{Application, GenesisConfig, NodeConfig, NodeRuntime};

fn load_genesis(config: &NodeConfig) -> Result<GenesisConfig> {
    match &config.genesis_path {
        Some(path) => {
            info!(path = %path.display(), "loading genesis");
            GenesisConfig::from_file(path).context("genesis")
        }
        None => {
            warn!(chain_id = %config.chain_id, "CC_GENESIS not set, using dev genesis");
            Ok(GenesisConfig::dev(&config.chain_id))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    init_telemetry(&telemetry).context("telemetry")?;

    let config = NodeConfig::from_env().context("configuration")?;
    info!(
        service = %telemetry.service_name,
        chain_id = %config.chain_id,
        block_interval_ms = config.block_interval_ms,
        "starting node"
    );

    let genesis = load_genesis(&config)?;
    let mut app = Application::new(
        config.chain_id.clone(),
        TickerConfig {
            max_tasks_per_tick: config.max_cron_tasks_per_tick,
        },
    )
    .context("building application")?;
    let genesis_commit = app
        .init_chain(UnixTime::now(), &genesis)
        .context("applying genesis")?;
    info!(app_hash = %hex::encode(genesis_commit.hash), "genesis committed");

    let runtime = NodeRuntime::new(app, config.block_interval(), config.mempool_capacity);
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let node = tokio::spawn(runtime.run(shutdown_rx));

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    shutdown_tx.send(true).ok();

    node.await.context("block loop task")??;
    Ok(())
}
