use crate::{
    error::ConnectError,
    services::{DiscordPresence, PriceSource, StatusPublisher},
};
use std::sync::Arc;
use std::time::Duration;
use twilight_gateway::ShardId;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// What happened during one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Published(String),
    PublishFailed(String),
    FetchFailed,
}

/// Poll-format-publish loop for one shard.
pub struct Worker {
    id: u64,
    source: Arc<dyn PriceSource>,
    publisher: Box<dyn StatusPublisher>,
    interval: Duration,
}

impl Worker {
    pub fn new(
        id: u64,
        source: Arc<dyn PriceSource>,
        publisher: Box<dyn StatusPublisher>,
        interval: Duration,
    ) -> Self {
        Self {
            id,
            source,
            publisher,
            interval,
        }
    }

    pub async fn run_cycle(&self) -> CycleOutcome {
        let snapshot = match self.source.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(
                    worker_id = self.id,
                    "Error getting gas price for shard {}: {}",
                    self.id,
                    e
                );
                return CycleOutcome::FetchFailed;
            }
        };

        let status = snapshot.to_string();
        tracing::info!(
            worker_id = self.id,
            fetched_at = %snapshot.fetched_at.to_rfc3339(),
            "WorkerId {} got {}",
            self.id,
            status
        );

        match self.publisher.publish(&status).await {
            Ok(()) => CycleOutcome::Published(status),
            Err(e) => {
                tracing::error!(
                    worker_id = self.id,
                    "Error updating Discord status for shard {}: {}",
                    self.id,
                    e
                );
                CycleOutcome::PublishFailed(status)
            }
        }
    }

    /// Never returns. The interval is slept after each cycle completes.
    pub async fn run(self) {
        tracing::info!(
            worker_id = self.id,
            interval_secs = self.interval.as_secs(),
            "Worker polling"
        );

        loop {
            self.run_cycle().await;
            tokio::time::sleep(self.interval).await;
        }
    }
}

/// Connects the shard, then polls on it forever.
/// Only a connection failure makes this return.
pub async fn run_shard(
    shard: ShardId,
    token: String,
    source: Arc<dyn PriceSource>,
    interval: Duration,
) -> Result<(), ConnectError> {
    let id = shard.number();
    tracing::info!(worker_id = id, "Connecting shard {} of {}", id, shard.total());

    let presence = DiscordPresence::connect(&token, shard).await?;
    Worker::new(id, source, Box::new(presence), interval).run().await;

    Ok(())
}
