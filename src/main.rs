use anyhow::{anyhow, Result};
use gas_status_bot::{
    config::Config,
    error::ConnectError,
    services::{run_shard, shard_ids, GasOracle, PriceSource},
};
use reqwest::Client;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting gas-status-bot v{} 👋🌍", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env()?;

    let client = Client::builder()
        .user_agent(concat!("gas-status-bot/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let oracle: Arc<dyn PriceSource> = Arc::new(GasOracle::new(
        client,
        config.oracle_url.clone(),
        config.api_key.clone(),
    ));

    // One worker per shard, each with its own gateway connection
    let mut workers = JoinSet::new();
    for shard in shard_ids(config.shard_count) {
        workers.spawn(run_shard(
            shard,
            config.token.clone(),
            oracle.clone(),
            config.poll_interval,
        ));
    }

    tokio::select! {
        res = supervise(&mut workers) => res,
        _ = shutdown_signal() => Ok(()),
    }
}

/// Resolves only when a worker stops, which means its shard failed to connect.
async fn supervise(workers: &mut JoinSet<Result<(), ConnectError>>) -> Result<()> {
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(Ok(())) => tracing::warn!("Worker exited"),
            Ok(Err(e)) => {
                tracing::error!("{}", e);
                return Err(e.into());
            }
            Err(e) => return Err(anyhow!("worker task failed: {}", e)),
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl+c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}
