use anyhow::{bail, Context, Result};
use std::time::Duration;

use crate::services::{DEFAULT_ORACLE_URL, DEFAULT_POLL_INTERVAL};

#[derive(Clone)]
pub struct Config {
    // Discord
    pub token: String,
    pub shard_count: u64,

    // Gas oracle
    pub api_key: String,
    pub oracle_url: String,

    pub poll_interval: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("shard_count", &self.shard_count)
            .field("api_key", &"<redacted>")
            .field("oracle_url", &self.oracle_url)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env loaded: {}", e);
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Could not find {} in environment or .env", key))
        };

        let config = Self {
            token: require("TOKEN")?,
            shard_count: lookup("SHARD_COUNT")
                .unwrap_or_else(|| "1".to_string())
                .parse()
                .context("Invalid SHARD_COUNT")?,

            api_key: require("API_KEY")?,
            oracle_url: lookup("GAS_ORACLE_URL").unwrap_or_else(|| DEFAULT_ORACLE_URL.to_string()),

            poll_interval: match lookup("POLL_INTERVAL_SECS") {
                Some(secs) => Duration::from_secs(
                    secs.parse().context("Invalid POLL_INTERVAL_SECS")?,
                ),
                None => DEFAULT_POLL_INTERVAL,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            bail!("TOKEN must not be empty");
        }
        if self.api_key.trim().is_empty() {
            bail!("API_KEY must not be empty");
        }
        if self.shard_count == 0 {
            bail!("SHARD_COUNT must be at least 1");
        }
        if self.poll_interval.is_zero() {
            bail!("POLL_INTERVAL_SECS must be at least 1");
        }
        if !self.oracle_url.starts_with("http") {
            bail!("GAS_ORACLE_URL must be HTTP(S) URL");
        }

        tracing::info!(
            "Configuration validated: {} shard(s), polling every {}s",
            self.shard_count,
            self.poll_interval.as_secs()
        );

        Ok(())
    }
}
