//! Symbol Resolver
//!
//! Maps a free-text coin name to a ticker with one search query. Which hit
//! wins is delegated to a `MatchRanking`, so disambiguation can change without
//! touching the analyzer.

use std::sync::Arc;

use crate::config::RankingMode;
use crate::error::{PredictorError, Result};
use crate::market::CoinSearch;
use crate::model::{CoinMatch, CoinName, Symbol};

/// Picks one search hit out of the ordered match list
pub trait MatchRanking: Send + Sync {
    fn select<'a>(&self, query: &str, matches: &'a [CoinMatch]) -> Option<&'a CoinMatch>;
}

/// First result wins
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstMatch;

impl MatchRanking for FirstMatch {
    fn select<'a>(&self, _query: &str, matches: &'a [CoinMatch]) -> Option<&'a CoinMatch> {
        matches.first()
    }
}

/// A hit whose id, name or symbol equals the query (case-insensitive) wins;
/// otherwise the first result.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactMatch;

impl MatchRanking for ExactMatch {
    fn select<'a>(&self, query: &str, matches: &'a [CoinMatch]) -> Option<&'a CoinMatch> {
        let query = query.trim().to_lowercase();
        matches
            .iter()
            .find(|c| [&c.id, &c.name, &c.symbol].iter().any(|field| field.to_lowercase() == query))
            .or_else(|| matches.first())
    }
}

pub fn ranking_for(mode: RankingMode) -> Arc<dyn MatchRanking> {
    match mode {
        RankingMode::First => Arc::new(FirstMatch),
        RankingMode::Exact => Arc::new(ExactMatch),
    }
}

/// Coin name to ticker resolution
pub struct SymbolResolver {
    search: Arc<dyn CoinSearch>,
    ranking: Arc<dyn MatchRanking>,
}

impl SymbolResolver {
    /// Resolver using `FirstMatch`
    pub fn new(search: Arc<dyn CoinSearch>) -> Self {
        Self {
            search,
            ranking: Arc::new(FirstMatch),
        }
    }

    pub fn with_ranking(mut self, ranking: Arc<dyn MatchRanking>) -> Self {
        self.ranking = ranking;
        self
    }

    /// Resolve a raw coin name
    pub async fn resolve(&self, coin_name: &str) -> Result<Symbol> {
        let name = CoinName::parse(coin_name)?;
        self.resolve_name(&name).await
    }

    pub async fn resolve_name(&self, name: &CoinName) -> Result<Symbol> {
        let matches = self.search.search(name.as_str()).await?;
        tracing::debug!(
            source = self.search.name(),
            coin = name.as_str(),
            hits = matches.len(),
            "Coin search complete"
        );

        let hit = self
            .ranking
            .select(name.as_str(), &matches)
            .ok_or_else(|| PredictorError::SymbolNotFound(name.as_str().to_string()))?;

        Symbol::parse(&hit.symbol).map_err(|_| {
            PredictorError::MalformedResponse(format!(
                "search hit '{}' has an unusable symbol '{}'",
                hit.id, hit.symbol
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MockMarketData;

    fn matches() -> Vec<CoinMatch> {
        vec![
            CoinMatch::new("wrapped-solana", "Wrapped SOL", "wsol"),
            CoinMatch::new("solana", "Solana", "sol"),
        ]
    }

    #[test]
    fn test_first_match() {
        let all = matches();
        assert_eq!(FirstMatch.select("solana", &all).unwrap().symbol, "wsol");
        assert!(FirstMatch.select("solana", &[]).is_none());
    }

    #[test]
    fn test_exact_match_prefers_equal_name() {
        let all = matches();
        assert_eq!(ExactMatch.select(" SOLANA ", &all).unwrap().symbol, "sol");
        assert_eq!(ExactMatch.select("sol", &all).unwrap().id, "solana");
        assert_eq!(ExactMatch.select("wrapped", &all).unwrap().symbol, "wsol");
    }

    #[test]
    fn test_exact_match_folds_non_ascii_case() {
        let all = vec![
            CoinMatch::new("ethereum", "Ethereum", "eth"),
            CoinMatch::new("eos-token", "ÉOS", "eos"),
        ];
        assert_eq!(ExactMatch.select("éos", &all).unwrap().symbol, "eos");
    }

    #[tokio::test]
    async fn test_resolve_uppercases_symbol() {
        let resolver = SymbolResolver::new(Arc::new(MockMarketData::new()));
        assert_eq!(resolver.resolve("solana").await.unwrap().as_str(), "SOL");
        assert_eq!(resolver.resolve("  BitCoin ").await.unwrap().as_str(), "BTC");
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let resolver = SymbolResolver::new(Arc::new(MockMarketData::new()));
        let err = resolver.resolve("definitely-not-a-coin").await.unwrap_err();
        assert!(matches!(err, PredictorError::SymbolNotFound(ref c) if c == "definitely-not-a-coin"));
    }

    #[tokio::test]
    async fn test_resolve_rejects_blank_without_search() {
        let market = Arc::new(MockMarketData::new());
        let resolver = SymbolResolver::new(market.clone());
        assert!(matches!(
            resolver.resolve("   ").await,
            Err(PredictorError::InvalidArgument(_))
        ));
        assert_eq!(market.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_resolve_never_returns_blank_symbol() {
        let market = MockMarketData::empty().with_coin(CoinMatch::new("ghost", "Ghost", "  "));
        let resolver = SymbolResolver::new(Arc::new(market));
        assert!(matches!(
            resolver.resolve("ghost").await,
            Err(PredictorError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_upstream_down() {
        let resolver = SymbolResolver::new(Arc::new(MockMarketData::unavailable()));
        assert!(matches!(
            resolver.resolve("bitcoin").await,
            Err(PredictorError::UpstreamUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_ranking_is_pluggable() {
        let market = MockMarketData::empty()
            .with_coin(CoinMatch::new("wrapped-solana", "Wrapped SOL", "wsol"))
            .with_coin(CoinMatch::new("solana", "Solana", "sol"));
        let resolver =
            SymbolResolver::new(Arc::new(market)).with_ranking(ranking_for(RankingMode::Exact));
        assert_eq!(resolver.resolve("solana").await.unwrap().as_str(), "SOL");
    }
}
