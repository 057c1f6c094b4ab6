use thiserror::Error;

use crate::models::PriceTier;

/// Failure of a single oracle poll. The worker logs it and skips the cycle.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to fetch: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to decode json: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("oracle rejected request: {message} ({detail})")]
    Upstream { message: String, detail: String },

    #[error("invalid {tier} amount format: {value:?}")]
    InvalidPrice { tier: PriceTier, value: String },
}

/// Failure to push a presence update onto an open gateway session.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("invalid presence payload: {0}")]
    Payload(String),

    #[error("gateway session closed: {0}")]
    Closed(String),
}

/// Failure to bring a shard up to `Ready`. Fatal for the worker.
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("error opening Discord gateway for shard {shard}: {reason}")]
    Gateway { shard: u64, reason: String },
}
