use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

use crate::error::FetchError;

/// Envelope returned by the gas tracker `gasoracle` action.
#[derive(Debug, Clone, Deserialize)]
pub struct GasOracleResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub result: OracleResult,
}

/// The oracle puts either the price table or an error string in `result`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OracleResult {
    Prices(GasOracleResult),
    Message(String),
}

/// Prices are quoted in gwei as decimal strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GasOracleResult {
    #[serde(rename = "LastBlock", default)]
    pub last_block: String,
    #[serde(rename = "SafeGasPrice", default)]
    pub safe_gas_price: String,
    #[serde(rename = "ProposeGasPrice", default)]
    pub propose_gas_price: String,
    #[serde(rename = "FastGasPrice", default)]
    pub fast_gas_price: String,
    #[serde(rename = "suggestBaseFee", default)]
    pub suggest_base_fee: String,
    #[serde(rename = "gasUsedRatio", default)]
    pub gas_used_ratio: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTier {
    Slow,
    Mid,
    Fast,
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PriceTier::Slow => "slow",
            PriceTier::Mid => "mid",
            PriceTier::Fast => "fast",
        };
        f.write_str(name)
    }
}

/// Whole-gwei prices from one oracle response. Rendered with `Display` as the bot status.
#[derive(Debug, Clone, PartialEq)]
pub struct GasSnapshot {
    pub fast: u64,
    pub mid: u64,
    pub slow: u64,
    pub fetched_at: DateTime<Utc>,
}

impl GasSnapshot {
    pub fn from_result(result: &GasOracleResult) -> Result<Self, FetchError> {
        let slow = parse_price(PriceTier::Slow, &result.safe_gas_price)?;
        let mid = parse_price(PriceTier::Mid, &result.propose_gas_price)?;
        let fast = parse_price(PriceTier::Fast, &result.fast_gas_price)?;

        Ok(Self {
            fast,
            mid,
            slow,
            fetched_at: Utc::now(),
        })
    }
}

impl fmt::Display for GasSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "🚀 {} | 🐦 {} | 🐌 {}",
            self.fast, self.mid, self.slow
        )
    }
}

/// Each tier is rounded on its own, half away from zero.
fn parse_price(tier: PriceTier, raw: &str) -> Result<u64, FetchError> {
    let invalid = || FetchError::InvalidPrice {
        tier,
        value: raw.to_string(),
    };

    let amount: f64 = raw.parse().map_err(|_| invalid())?;
    let rounded = amount.round();
    if !rounded.is_finite() || rounded < 0.0 || rounded >= u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(rounded as u64)
}
