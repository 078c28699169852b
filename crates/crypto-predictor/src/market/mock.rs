//! Mock Market Data
//!
//! For testing and demo purposes. Serves a static coin table and
//! deterministic daily closes without touching the network. Counts calls so
//! tests can assert that validation failures never reach a source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{CoinSearch, PriceHistory};
use crate::error::{PredictorError, Result};
use crate::model::{AnalysisRequest, CoinMatch, PriceSeries};

/// (id, name, symbol, market cap rank, reference price in USD)
const COINS: &[(&str, &str, &str, u32, f64)] = &[
    ("bitcoin", "Bitcoin", "btc", 1, 97_500.0),
    ("ethereum", "Ethereum", "eth", 2, 3_450.0),
    ("ripple", "XRP", "xrp", 4, 2.35),
    ("solana", "Solana", "sol", 5, 195.0),
    ("dogecoin", "Dogecoin", "doge", 8, 0.38),
    ("cardano", "Cardano", "ada", 9, 0.95),
    ("avalanche-2", "Avalanche", "avax", 12, 42.0),
    ("chainlink", "Chainlink", "link", 13, 24.5),
    ("polkadot", "Polkadot", "dot", 18, 7.2),
    ("bitcoin-cash", "Bitcoin Cash", "bch", 20, 485.0),
    ("litecoin", "Litecoin", "ltc", 22, 105.0),
    ("wrapped-solana", "Wrapped SOL", "wsol", 900, 195.0),
];

/// In-memory coin search and daily history
pub struct MockMarketData {
    coins: Vec<CoinMatch>,
    reference_prices: HashMap<String, f64>,
    series: HashMap<String, Vec<f64>>,
    unavailable: bool,
    search_calls: AtomicUsize,
    history_calls: AtomicUsize,
}

impl Default for MockMarketData {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarketData {
    /// Built-in coin table with synthetic history for every coin
    pub fn new() -> Self {
        let coins = COINS
            .iter()
            .map(|&(id, name, symbol, rank, _)| CoinMatch {
                market_cap_rank: Some(rank),
                ..CoinMatch::new(id, name, symbol)
            })
            .collect();
        let reference_prices = COINS
            .iter()
            .map(|&(_, _, symbol, _, price)| (symbol.to_uppercase(), price))
            .collect();

        Self {
            coins,
            reference_prices,
            series: HashMap::new(),
            unavailable: false,
            search_calls: AtomicUsize::new(0),
            history_calls: AtomicUsize::new(0),
        }
    }

    /// No coins and no history
    pub fn empty() -> Self {
        Self {
            coins: Vec::new(),
            reference_prices: HashMap::new(),
            ..Self::new()
        }
    }

    /// Every call fails as if the network were down
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new()
        }
    }

    /// Append a search hit (after the built-in ones)
    pub fn with_coin(mut self, coin: CoinMatch) -> Self {
        self.coins.push(coin);
        self
    }

    /// Fixed closes for a symbol, oldest first. Served as-is when shorter than
    /// the requested window, else the trailing `days + 1` points.
    pub fn with_series(mut self, symbol: &str, closes: Vec<f64>) -> Self {
        self.series.insert(symbol.to_uppercase(), closes);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    /// Deterministic wave around the reference price, `days + 1` points
    fn synthetic_closes(reference: f64, days: u32) -> Vec<f64> {
        (0..=days)
            .map(|i| reference * (1.0 + 0.04 * f64::from(i).sin() + 0.01 * f64::from(i % 7) / 7.0))
            .collect()
    }
}

#[async_trait]
impl CoinSearch for MockMarketData {
    async fn search(&self, query: &str) -> Result<Vec<CoinMatch>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(PredictorError::UpstreamUnavailable("mock search offline".into()));
        }

        let needle = query.trim().to_lowercase();
        Ok(self
            .coins
            .iter()
            .filter(|c| {
                c.id.to_lowercase().contains(&needle)
                    || c.name.to_lowercase().contains(&needle)
                    || c.symbol.to_lowercase() == needle
            })
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "MockMarket"
    }
}

#[async_trait]
impl PriceHistory for MockMarketData {
    async fn daily_closes(&self, request: &AnalysisRequest, _quote_currency: &str) -> Result<PriceSeries> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(PredictorError::UpstreamUnavailable("mock history offline".into()));
        }

        let symbol = request.symbol.as_str();
        let wanted = request.days as usize + 1;

        if let Some(closes) = self.series.get(symbol) {
            let start = closes.len().saturating_sub(wanted);
            return Ok(PriceSeries::from_closes(&closes[start..]));
        }

        let reference = self.reference_prices.get(symbol).ok_or_else(|| {
            PredictorError::UpstreamUnavailable(format!(
                "history service rejected request: There is no data for the symbol {symbol}"
            ))
        })?;
        Ok(PriceSeries::from_closes(&Self::synthetic_closes(*reference, request.days)))
    }

    fn name(&self) -> &str {
        "MockMarket"
    }
}
