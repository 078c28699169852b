//! Predictor Configuration
//!
//! Endpoints, quote currency and transport settings. Defaults match the
//! public CoinGecko and CryptoCompare APIs priced in USD.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};

pub const DEFAULT_SEARCH_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_HISTORY_BASE_URL: &str = "https://min-api.cryptocompare.com/data/v2";
pub const DEFAULT_QUOTE_CURRENCY: &str = "USD";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// How a search hit is picked out of the match list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    /// First result wins
    #[default]
    First,
    /// Exact id/name/symbol match wins, else first result
    Exact,
}

impl RankingMode {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(Self::First),
            "exact" => Ok(Self::Exact),
            other => Err(PredictorError::Config(format!("unknown ranking mode '{other}'"))),
        }
    }
}

/// Where market data comes from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Public HTTP APIs
    #[default]
    Live,
    /// Built-in static data, no network
    Mock,
}

impl DataSource {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "mock" => Ok(Self::Mock),
            other => Err(PredictorError::Config(format!("unknown data source '{other}'"))),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Mock => "mock",
        }
    }
}

/// Predictor configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Currency prices are quoted in (`tsym`)
    pub quote_currency: String,

    /// Base URL of the coin search service
    pub search_base_url: String,

    /// Base URL of the daily history service
    pub history_base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Search hit selection
    pub ranking: RankingMode,

    /// Live APIs or built-in mock data
    pub data_source: DataSource,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            quote_currency: DEFAULT_QUOTE_CURRENCY.into(),
            search_base_url: DEFAULT_SEARCH_BASE_URL.into(),
            history_base_url: DEFAULT_HISTORY_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            ranking: RankingMode::default(),
            data_source: DataSource::default(),
        }
    }
}

impl PredictorConfig {
    /// Build from `PREDICTOR_*` environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let timeout_secs = match lookup("PREDICTOR_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| PredictorError::Config(format!("invalid PREDICTOR_TIMEOUT_SECS '{raw}'")))?,
            None => defaults.timeout_secs,
        };

        let ranking = match lookup("PREDICTOR_RANKING") {
            Some(raw) => RankingMode::parse(&raw)?,
            None => defaults.ranking,
        };

        let data_source = match lookup("PREDICTOR_DATA_SOURCE") {
            Some(raw) => DataSource::parse(&raw)?,
            None => defaults.data_source,
        };

        let config = Self {
            quote_currency: lookup("PREDICTOR_QUOTE_CURRENCY")
                .map_or(defaults.quote_currency, |c| c.trim().to_uppercase()),
            search_base_url: lookup("PREDICTOR_SEARCH_BASE_URL").unwrap_or(defaults.search_base_url),
            history_base_url: lookup("PREDICTOR_HISTORY_BASE_URL").unwrap_or(defaults.history_base_url),
            timeout_secs,
            ranking,
            data_source,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.quote_currency.trim().is_empty() {
            return Err(PredictorError::Config("quote currency must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(PredictorError::Config("timeout must be at least one second".into()));
        }
        for url in [&self.search_base_url, &self.history_base_url] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(PredictorError::Config(format!("base URL '{url}' is not http(s)")));
            }
        }
        Ok(())
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
