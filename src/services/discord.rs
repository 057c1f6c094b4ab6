use crate::error::{ConnectError, PublishError};
use async_trait::async_trait;
use tokio::task::JoinHandle;
use twilight_gateway::{Event, Intents, MessageSender, Shard, ShardId};
use twilight_model::gateway::{
    payload::outgoing::UpdatePresence,
    presence::{Activity, ActivityType, MinimalActivity, Status},
};

/// Sink for the bot's visible status text.
#[async_trait]
pub trait StatusPublisher: Send + Sync {
    async fn publish(&self, text: &str) -> Result<(), PublishError>;
}

/// One open gateway shard. The shard itself is driven by a background task
/// for as long as this value lives; presence updates go through its sender.
pub struct DiscordPresence {
    sender: MessageSender,
    driver: JoinHandle<()>,
}

impl DiscordPresence {
    /// Opens the shard and waits for `Ready`.
    pub async fn connect(token: &str, shard_id: ShardId) -> Result<Self, ConnectError> {
        let id = shard_id.number();
        let mut shard = Shard::new(shard_id, token.to_string(), Intents::empty());

        loop {
            match shard.next_event().await {
                Ok(Event::Ready(ready)) => {
                    tracing::info!(
                        shard = id,
                        user = %ready.user.name,
                        "Discord gateway ready"
                    );
                    break;
                }
                Ok(_) => {}
                Err(source) => {
                    return Err(ConnectError::Gateway {
                        shard: id,
                        reason: source.to_string(),
                    });
                }
            }
        }

        let sender = shard.sender();
        let driver = tokio::spawn(drive(shard));

        Ok(Self { sender, driver })
    }
}

impl Drop for DiscordPresence {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

#[async_trait]
impl StatusPublisher for DiscordPresence {
    async fn publish(&self, text: &str) -> Result<(), PublishError> {
        let presence = watching(text)?;
        self.sender
            .command(&presence)
            .map_err(|e| PublishError::Closed(e.to_string()))
    }
}

/// Every shard of a `total`-shard deployment, in order.
pub fn shard_ids(total: u64) -> impl Iterator<Item = ShardId> {
    (0..total).map(move |id| ShardId::new(id, total))
}

/// Presence payload equivalent to a "Watching {text}" status while online.
pub fn watching(text: &str) -> Result<UpdatePresence, PublishError> {
    let activity = Activity::from(MinimalActivity {
        kind: ActivityType::Watching,
        name: text.to_string(),
        url: None,
    });

    UpdatePresence::new(vec![activity], false, None::<u64>, Status::Online)
        .map_err(|e| PublishError::Payload(e.to_string()))
}

/// Keeps heartbeats flowing. Twilight reconnects on its own for non-fatal errors.
async fn drive(mut shard: Shard) {
    let id = shard.id().number();
    loop {
        match shard.next_event().await {
            Ok(Event::GatewayReconnect) => tracing::debug!(shard = id, "Gateway requested reconnect"),
            Ok(_) => {}
            Err(source) if source.is_fatal() => {
                tracing::error!(shard = id, error = %source, "Discord gateway closed");
                break;
            }
            Err(source) => {
                tracing::warn!(shard = id, error = %source, "Discord gateway error");
            }
        }
    }
}
