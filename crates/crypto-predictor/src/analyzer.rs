//! Price Analyzer
//!
//! Fetches a daily close series for a ticker, computes window statistics and
//! derives buy/sell thresholds 3% inside the window low/high. The thresholds
//! are a fixed heuristic, not a forecast.

use std::sync::Arc;

use crate::config::DEFAULT_QUOTE_CURRENCY;
use crate::error::{PredictorError, Result};
use crate::market::PriceHistory;
use crate::model::{AnalysisRequest, AnalysisResult, Symbol};

pub struct PriceAnalyzer {
    history: Arc<dyn PriceHistory>,
    quote_currency: String,
}

impl PriceAnalyzer {
    /// Analyzer quoting in USD
    pub fn new(history: Arc<dyn PriceHistory>) -> Self {
        Self {
            history,
            quote_currency: DEFAULT_QUOTE_CURRENCY.into(),
        }
    }

    pub fn with_quote_currency(mut self, quote_currency: impl Into<String>) -> Self {
        self.quote_currency = quote_currency.into().to_uppercase();
        self
    }

    pub fn quote_currency(&self) -> &str {
        &self.quote_currency
    }

    /// Analyze `days` of history for `symbol`; the result's coin is the symbol
    pub async fn analyze(&self, symbol: &Symbol, days: i64) -> Result<AnalysisResult> {
        self.analyze_as(symbol.to_string(), symbol, days).await
    }

    /// Analyze and label the result with a display coin name
    pub async fn analyze_as(&self, coin: String, symbol: &Symbol, days: i64) -> Result<AnalysisResult> {
        // Rejected before any request is made
        let request = AnalysisRequest::new(symbol.clone(), days)?;

        let series = self
            .history
            .daily_closes(&request, &self.quote_currency)
            .await?;

        let stats = series
            .stats()
            .ok_or_else(|| PredictorError::EmptySeries(symbol.to_string()))?;

        tracing::debug!(
            source = self.history.name(),
            symbol = %symbol,
            points = stats.len,
            "Daily history loaded"
        );

        let result = AnalysisResult::from_stats(coin, request.symbol, request.days, &stats)?;
        tracing::info!(
            symbol = %result.symbol,
            days = result.days,
            buy_below = %result.suggested_buy_below,
            sell_above = %result.suggested_sell_above,
            "Price analysis complete"
        );
        Ok(result)
    }
}
