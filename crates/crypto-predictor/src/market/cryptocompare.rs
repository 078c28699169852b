//! CryptoCompare Daily History Client
//!
//! `GET {base}/histoday?fsym=<SYM>&tsym=<QUOTE>&limit=<days>`. The service
//! answers HTTP 200 even for rejected requests and signals them with
//! `"Response": "Error"`; successful bodies nest the records under
//! `Data.Data`, `limit + 1` of them, oldest first.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;

use super::{PriceHistory, http_client};
use crate::error::{PredictorError, Result};
use crate::model::{AnalysisRequest, PricePoint, PriceSeries};

/// Parse a histoday body into a series, coercing `close` to `f64`
pub fn parse_history_response(body: &str) -> Result<PriceSeries> {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| PredictorError::MalformedResponse(format!("history body is not JSON: {e}")))?;

    if root.get("Response").and_then(Value::as_str) == Some("Error") {
        let message = root
            .get("Message")
            .and_then(Value::as_str)
            .unwrap_or("unspecified error");
        return Err(PredictorError::UpstreamUnavailable(format!(
            "history service rejected request: {message}"
        )));
    }

    let records = root
        .get("Data")
        .and_then(|d| d.get("Data"))
        .and_then(Value::as_array)
        .ok_or_else(|| PredictorError::MalformedResponse("missing Data.Data array".into()))?;

    let points = records
        .iter()
        .enumerate()
        .map(|(i, record)| parse_record(i, record))
        .collect::<Result<Vec<_>>>()?;

    Ok(PriceSeries::new(points))
}

fn parse_record(index: usize, record: &Value) -> Result<PricePoint> {
    let close = match record.get("close") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|c| c.is_finite())
    .ok_or_else(|| PredictorError::MalformedResponse(format!("record {index} has no numeric close")))?;

    let time = record
        .get("time")
        .and_then(Value::as_i64)
        .and_then(|t| DateTime::from_timestamp(t, 0));

    Ok(PricePoint::new(time, close))
}

/// Daily history from the CryptoCompare API
pub struct CryptoCompareClient {
    client: reqwest::Client,
    base_url: String,
}

impl CryptoCompareClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    fn histoday_url(&self) -> String {
        format!("{}/histoday", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PriceHistory for CryptoCompareClient {
    async fn daily_closes(&self, request: &AnalysisRequest, quote_currency: &str) -> Result<PriceSeries> {
        let url = self.histoday_url();
        tracing::debug!(%url, symbol = %request.symbol, quote_currency, days = request.days, "Fetching daily history");

        let limit = request.days.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("fsym", request.symbol.as_str()),
                ("tsym", quote_currency),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .inspect_err(|e| tracing::warn!("History request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, symbol = %request.symbol, "History request returned an error status");
            return Err(PredictorError::UpstreamUnavailable(format!(
                "history service returned HTTP {status}"
            )));
        }

        let body = response.text().await?;
        parse_history_response(&body)
    }

    fn name(&self) -> &str {
        "CryptoCompare"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::local_http;
    use crate::model::Symbol;

    fn sol_request(days: i64) -> AnalysisRequest {
        AnalysisRequest::new(Symbol::parse("sol").unwrap(), days).unwrap()
    }

    const SUCCESS: &str = r#"{
        "Response": "Success",
        "Message": "",
        "HasWarning": false,
        "Type": 100,
        "RateLimit": {},
        "Data": {
            "Aggregated": false,
            "TimeFrom": 1700000000,
            "TimeTo": 1700172800,
            "Data": [
                {"time": 1700000000, "high": 11.0, "low": 9.0, "open": 9.5, "volumefrom": 1, "volumeto": 10, "close": 10.0},
                {"time": 1700086400, "high": 21.0, "low": 9.0, "open": 10.0, "volumefrom": 1, "volumeto": 10, "close": 20},
                {"time": 1700172800, "high": 21.0, "low": 4.0, "open": 20.0, "volumefrom": 1, "volumeto": 10, "close": "5.5"}
            ]
        }
    }"#;

    #[test]
    fn test_parse_history_in_response_order() {
        let series = parse_history_response(SUCCESS).unwrap();
        let closes: Vec<f64> = series.points.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![10.0, 20.0, 5.5]);
        assert_eq!(series.points[0].time.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_error_envelope_is_upstream_failure() {
        let body = r#"{"Response": "Error", "Message": "fsym param is empty or null.", "HasWarning": false, "Type": 2, "RateLimit": {}, "Data": {}}"#;
        let err = parse_history_response(body).unwrap_err();
        assert!(matches!(err, PredictorError::UpstreamUnavailable(ref m) if m.contains("fsym param")));
    }

    #[test]
    fn test_empty_data_parses_to_empty_series() {
        let body = r#"{"Response": "Success", "Data": {"Data": []}}"#;
        assert!(parse_history_response(body).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_history_bodies() {
        for body in [
            "not json",
            r#"{"Response": "Success", "Data": {}}"#,
            r#"{"Response": "Success", "Data": {"Data": [{"time": 1}]}}"#,
            r#"{"Response": "Success", "Data": {"Data": [{"close": "abc"}]}}"#,
            r#"{"Response": "Success", "Data": {"Data": [{"close": "NaN"}]}}"#,
            r#"{"Response": "Success", "Data": {"Data": [{"close": null}]}}"#,
        ] {
            assert!(
                matches!(parse_history_response(body), Err(PredictorError::MalformedResponse(_))),
                "expected malformed for {body}"
            );
        }
    }

    #[tokio::test]
    async fn test_client_sends_symbol_quote_and_limit() {
        let (base, server) = local_http::respond_once("200 OK", SUCCESS).await;
        let client = CryptoCompareClient::new(format!("{base}/data/v2"), Duration::from_secs(5)).unwrap();

        let series = client.daily_closes(&sol_request(7), "EUR").await.unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(
            server.await.unwrap(),
            "GET /data/v2/histoday?fsym=SOL&tsym=EUR&limit=7 HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_client_error_status_is_upstream_failure() {
        let (base, server) = local_http::respond_once("500 Internal Server Error", "{}").await;
        let client = CryptoCompareClient::new(base, Duration::from_secs(5)).unwrap();

        let err = client.daily_closes(&sol_request(7), "USD").await.unwrap_err();
        assert!(matches!(err, PredictorError::UpstreamUnavailable(ref m) if m.contains("500")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_client_timeout_is_upstream_failure() {
        let (base, server) = local_http::stall().await;
        let client = CryptoCompareClient::new(base, Duration::from_secs(1)).unwrap();

        let err = client.daily_closes(&sol_request(7), "USD").await.unwrap_err();
        assert!(matches!(err, PredictorError::UpstreamUnavailable(ref m) if m.contains("timeout")));
        server.abort();
    }
}
