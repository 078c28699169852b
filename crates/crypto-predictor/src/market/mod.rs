//! Market Data Sources
//!
//! Abstractions over the coin search and daily history services, with
//! reqwest-backed clients for the public APIs and an in-memory mock.

mod coingecko;
mod cryptocompare;
mod mock;

pub use coingecko::{CoinGeckoClient, parse_search_response};
pub use cryptocompare::{CryptoCompareClient, parse_history_response};
pub use mock::MockMarketData;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{AnalysisRequest, CoinMatch, PriceSeries};

/// Coin search service (Strategy pattern)
///
/// Returns matches in the order the service ranks them.
#[async_trait]
pub trait CoinSearch: Send + Sync {
    /// Search coins by free-text name
    async fn search(&self, query: &str) -> Result<Vec<CoinMatch>>;

    /// Source name, for logs
    fn name(&self) -> &str;
}

/// Daily close history service (Strategy pattern)
#[async_trait]
pub trait PriceHistory: Send + Sync {
    /// Daily closes for `request.symbol` quoted in `quote_currency`, oldest first.
    /// Sources following the CryptoCompare convention return `days + 1` points.
    async fn daily_closes(&self, request: &AnalysisRequest, quote_currency: &str) -> Result<PriceSeries>;

    /// Source name, for logs
    fn name(&self) -> &str;
}

/// Shared reqwest client with the configured per-request timeout
pub(crate) fn http_client(timeout: std::time::Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("crypto-predictor/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| crate::error::PredictorError::Config(format!("failed to build HTTP client: {e}")))
}
