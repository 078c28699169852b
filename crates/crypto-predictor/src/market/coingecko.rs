//! CoinGecko Search Client
//!
//! `GET {base}/search?query=<name>` returning `{"coins": [{"id", "name", "symbol", ...}]}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{CoinSearch, http_client};
use crate::error::{PredictorError, Result};
use crate::model::CoinMatch;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Vec<CoinMatch>,
}

/// Parse a search body. A body without `coins` means no matches.
pub fn parse_search_response(body: &str) -> Result<Vec<CoinMatch>> {
    serde_json::from_str::<SearchResponse>(body)
        .map(|r| r.coins)
        .map_err(|e| PredictorError::UpstreamUnavailable(format!("malformed search response: {e}")))
}

/// Coin search against the CoinGecko API
pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CoinSearch for CoinGeckoClient {
    async fn search(&self, query: &str) -> Result<Vec<CoinMatch>> {
        let url = self.search_url();
        tracing::debug!(%url, query, "Searching coins");

        let response = self
            .client
            .get(&url)
            .query(&[("query", query)])
            .send()
            .await
            .inspect_err(|e| tracing::warn!("Coin search failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Coin search returned an error status");
            return Err(PredictorError::UpstreamUnavailable(format!(
                "coin search returned HTTP {status}"
            )));
        }

        let body = response.text().await?;
        parse_search_response(&body)
    }

    fn name(&self) -> &str {
        "CoinGecko"
    }
}
