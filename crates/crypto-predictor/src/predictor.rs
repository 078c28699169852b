//! Crypto Predictor
//!
//! Composes the resolver and analyzer behind the single call agents use:
//! coin name and window in, `AnalysisResult` out.

use std::sync::Arc;

use crate::analyzer::PriceAnalyzer;
use crate::config::{DataSource, PredictorConfig};
use crate::error::Result;
use crate::market::{CoinGeckoClient, CoinSearch, CryptoCompareClient, MockMarketData, PriceHistory};
use crate::model::{AnalysisResult, CoinName, Symbol, validate_days};
use crate::resolver::{SymbolResolver, ranking_for};

pub struct CryptoPredictor {
    resolver: SymbolResolver,
    analyzer: PriceAnalyzer,
    data_source: DataSource,
}

impl CryptoPredictor {
    pub const fn new(resolver: SymbolResolver, analyzer: PriceAnalyzer, data_source: DataSource) -> Self {
        Self {
            resolver,
            analyzer,
            data_source,
        }
    }

    /// Wire sources according to `config.data_source`
    pub fn from_config(config: &PredictorConfig) -> Result<Self> {
        config.validate()?;

        match config.data_source {
            DataSource::Live => {
                let search = Arc::new(CoinGeckoClient::new(&config.search_base_url, config.timeout())?);
                let history = Arc::new(CryptoCompareClient::new(&config.history_base_url, config.timeout())?);
                Ok(Self::with_sources(search, history, config))
            }
            DataSource::Mock => {
                let market = Arc::new(MockMarketData::new());
                Ok(Self::with_sources(market.clone(), market, config))
            }
        }
    }

    /// Build over arbitrary sources, taking ranking and quote currency from `config`
    pub fn with_sources(
        search: Arc<dyn CoinSearch>,
        history: Arc<dyn PriceHistory>,
        config: &PredictorConfig,
    ) -> Self {
        let resolver = SymbolResolver::new(search).with_ranking(ranking_for(config.ranking));
        let analyzer = PriceAnalyzer::new(history).with_quote_currency(&config.quote_currency);
        Self::new(resolver, analyzer, config.data_source)
    }

    pub const fn data_source(&self) -> DataSource {
        self.data_source
    }

    pub fn resolver(&self) -> &SymbolResolver {
        &self.resolver
    }

    pub fn analyzer(&self) -> &PriceAnalyzer {
        &self.analyzer
    }

    pub async fn resolve(&self, coin_name: &str) -> Result<Symbol> {
        self.resolver.resolve(coin_name).await
    }

    pub async fn analyze(&self, symbol: &Symbol, days: i64) -> Result<AnalysisResult> {
        self.analyzer.analyze(symbol, days).await
    }

    /// Resolve `coin` then analyze `days` of its history. Both inputs are
    /// validated before the first request.
    pub async fn predict_any_crypto(&self, coin: &str, days: i64) -> Result<AnalysisResult> {
        validate_days(days)?;
        let name = CoinName::parse(coin)?;

        let symbol = self.resolver.resolve_name(&name).await?;
        tracing::debug!(coin = name.as_str(), symbol = %symbol, "Coin resolved");

        self.analyzer.analyze_as(name.display_name(), &symbol, days).await
    }
}
