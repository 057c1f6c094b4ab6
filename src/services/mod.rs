pub mod discord;
pub mod oracle;
pub mod worker;

pub use discord::{shard_ids, DiscordPresence, StatusPublisher};
pub use oracle::{GasOracle, PriceSource, DEFAULT_ORACLE_URL};
pub use worker::{run_shard, CycleOutcome, Worker, DEFAULT_POLL_INTERVAL};
