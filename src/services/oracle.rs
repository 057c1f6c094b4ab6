use crate::{
    error::FetchError,
    models::{GasOracleResponse, GasSnapshot, OracleResult},
};
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_ORACLE_URL: &str = "https://api.etherscan.io/api";

/// Something the worker can poll for the current gas prices.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<GasSnapshot, FetchError>;
}

/// Etherscan-compatible gas tracker client.
pub struct GasOracle {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GasOracle {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl PriceSource for GasOracle {
    async fn fetch_snapshot(&self) -> Result<GasSnapshot, FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("module", "gastracker"),
                ("action", "gasoracle"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(FetchError::Transport)?;

        tracing::debug!(status = %response.status(), "Gas oracle responded");

        let payload: GasOracleResponse = response.json().await.map_err(FetchError::Decode)?;

        match payload.result {
            OracleResult::Prices(prices) => GasSnapshot::from_result(&prices),
            OracleResult::Message(detail) => Err(FetchError::Upstream {
                message: payload.message,
                detail,
            }),
        }
    }
}
