mod config;

use clap::Parser as _;
use config::Config;
use tracing::info;
use tt_local::{backend::StubBackend, cards::CardPlanner, logging, start_server};

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let config = Config::parse().validate()?;

    let level = logging::resolve_log_level(config.log_level.as_deref())?;
    logging::init_tracing(level);
    info!("Starting Tenstorrent stub server with config: {:?}", config);

    let planner = CardPlanner::new(&config.wormhole_models);
    info!(
        wormhole_models = ?planner.wormhole_models().collect::<Vec<_>>(),
        "Resolved wormhole-capable models"
    );

    start_server(config.server_config(), StubBackend::new(planner)).await
}
