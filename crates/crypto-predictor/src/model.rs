//! Domain Models
//!
//! Inputs, intermediate series and the analysis result. Statistics are
//! computed in `f64`; reported prices are `rust_decimal` values rounded once,
//! at the output boundary.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};

/// Multiplier applied to the window low for the buy threshold
pub const BUY_OFFSET: f64 = 1.03;

/// Multiplier applied to the window high for the sell threshold
pub const SELL_OFFSET: f64 = 0.97;

/// Largest lookback the history service accepts
pub const MAX_LOOKBACK_DAYS: i64 = 2000;

/// Decimal places of every reported price
pub const PRICE_DP: u32 = 2;

/// A free-text coin name as typed by the user (e.g. "solana", "Bitcoin Cash")
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CoinName(String);

impl CoinName {
    /// Trim and reject empty input
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PredictorError::InvalidArgument(
                "coin name must not be empty".into(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The query string sent to the search service
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First character upper-cased, the rest lower-cased
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
        })
    }
}

impl TryFrom<String> for CoinName {
    type Error = PredictorError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CoinName> for String {
    fn from(value: CoinName) -> Self {
        value.0
    }
}

/// Upper-case exchange ticker (e.g. "BTC"). Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PredictorError::InvalidArgument("symbol must not be empty".into()));
        }
        if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(PredictorError::InvalidArgument(format!(
                "symbol '{trimmed}' contains whitespace"
            )));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = PredictorError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

/// One hit from the coin search service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinMatch {
    /// Search-service identifier (e.g. "solana")
    #[serde(default)]
    pub id: String,

    /// Display name (e.g. "Solana")
    #[serde(default)]
    pub name: String,

    /// Ticker as returned upstream, any case
    pub symbol: String,

    #[serde(default)]
    pub market_cap_rank: Option<u32>,
}

impl CoinMatch {
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            market_cap_rank: None,
        }
    }
}

/// Validated lookback request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub symbol: Symbol,
    pub days: u32,
}

impl AnalysisRequest {
    pub fn new(symbol: Symbol, days: i64) -> Result<Self> {
        Ok(Self {
            symbol,
            days: validate_days(days)?,
        })
    }
}

/// Check a lookback window: `1..=MAX_LOOKBACK_DAYS`
pub fn validate_days(days: i64) -> Result<u32> {
    if days <= 0 {
        return Err(PredictorError::InvalidArgument(format!(
            "days must be a positive integer, got {days}"
        )));
    }
    if days > MAX_LOOKBACK_DAYS {
        return Err(PredictorError::InvalidArgument(format!(
            "days must be at most {MAX_LOOKBACK_DAYS}, got {days}"
        )));
    }
    u32::try_from(days).map_err(|_| PredictorError::InvalidArgument(format!("days out of range: {days}")))
}

/// A single daily close
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Start of the day (UTC), when the upstream supplies it
    pub time: Option<DateTime<Utc>>,

    pub close: f64,
}

impl PricePoint {
    pub const fn new(time: Option<DateTime<Utc>>, close: f64) -> Self {
        Self { time, close }
    }
}

/// Daily closes in chronological order (oldest first)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub const fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    /// Series without timestamps, mostly for tests and mock data
    pub fn from_closes(closes: &[f64]) -> Self {
        Self {
            points: closes.iter().map(|&c| PricePoint::new(None, c)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Summary statistics; `None` for an empty series
    pub fn stats(&self) -> Option<PriceStats> {
        let current = self.points.last()?.close;

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for point in &self.points {
            min = min.min(point.close);
            max = max.max(point.close);
            sum += point.close;
        }

        #[allow(clippy::cast_precision_loss)]
        let mean = sum / self.points.len() as f64;

        Some(PriceStats {
            current,
            min,
            max,
            mean,
            len: self.points.len(),
        })
    }
}

/// Unrounded statistics over a price series
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceStats {
    pub current: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub len: usize,
}

impl PriceStats {
    /// 3% above the window low
    pub fn suggested_buy(&self) -> f64 {
        self.min * BUY_OFFSET
    }

    /// 3% below the window high
    pub fn suggested_sell(&self) -> f64 {
        self.max * SELL_OFFSET
    }
}

/// Round a computed price to `PRICE_DP` places, half-up
pub fn round_price(value: f64) -> Result<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(PRICE_DP, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| PredictorError::MalformedResponse(format!("price {value} is not representable")))
}

/// Result of one price analysis. Serializes as a flat record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Coin name in display form ("Solana")
    pub coin: String,

    /// Resolved ticker ("SOL")
    pub symbol: Symbol,

    /// Requested lookback window
    pub days: u32,

    /// Points actually analysed; the history service returns `days + 1`
    pub data_points: usize,

    #[serde(with = "rust_decimal::serde::float")]
    pub current_price: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub min_price: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub max_price: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub average_price: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub suggested_buy_below: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub suggested_sell_above: Decimal,
}

impl AnalysisResult {
    pub fn from_stats(coin: String, symbol: Symbol, days: u32, stats: &PriceStats) -> Result<Self> {
        Ok(Self {
            coin,
            symbol,
            days,
            data_points: stats.len,
            current_price: round_price(stats.current)?,
            min_price: round_price(stats.min)?,
            max_price: round_price(stats.max)?,
            average_price: round_price(stats.mean)?,
            suggested_buy_below: round_price(stats.suggested_buy())?,
            suggested_sell_above: round_price(stats.suggested_sell())?,
        })
    }

    /// Human-readable report
    pub fn summary(&self) -> String {
        format!(
            "📊 {} ({}) – {}-Day Price Analysis\n\
             - Current Price:   ${:.2}\n\
             - Lowest Price:    ${:.2}\n\
             - Highest Price:   ${:.2}\n\
             - Average Price:   ${:.2}\n\
             \n\
             📉 Suggested Buy Below:  ${:.2}\n\
             📈 Suggested Sell Above: ${:.2}",
            self.coin,
            self.symbol,
            self.days,
            self.current_price,
            self.min_price,
            self.max_price,
            self.average_price,
            self.suggested_buy_below,
            self.suggested_sell_above,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_coin_name_display() {
        assert_eq!(CoinName::parse("  solana ").unwrap().display_name(), "Solana");
        assert_eq!(CoinName::parse("BITCOIN cash").unwrap().display_name(), "Bitcoin cash");
        assert_eq!(CoinName::parse("solana").unwrap().as_str(), "solana");
        assert!(matches!(
            CoinName::parse("   "),
            Err(PredictorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_symbol_normalized() {
        assert_eq!(Symbol::parse(" sol ").unwrap().as_str(), "SOL");
        assert!(Symbol::parse("").is_err());
        assert!(Symbol::parse("S OL").is_err());
    }

    #[test]
    fn test_validate_days() {
        assert_eq!(validate_days(1).unwrap(), 1);
        assert_eq!(validate_days(MAX_LOOKBACK_DAYS).unwrap(), 2000);
        for bad in [0, -1, i64::MIN, MAX_LOOKBACK_DAYS + 1] {
            assert!(matches!(validate_days(bad), Err(PredictorError::InvalidArgument(_))));
        }
    }

    #[test]
    fn test_stats_reference_series() {
        let stats = PriceSeries::from_closes(&[10.0, 20.0, 5.0, 15.0]).stats().unwrap();
        assert!((stats.current - 15.0).abs() < f64::EPSILON);
        assert!((stats.min - 5.0).abs() < f64::EPSILON);
        assert!((stats.max - 20.0).abs() < f64::EPSILON);
        assert!((stats.mean - 12.5).abs() < f64::EPSILON);
        assert_eq!(stats.len, 4);

        let result =
            AnalysisResult::from_stats("Test".into(), Symbol::parse("TST").unwrap(), 3, &stats).unwrap();
        assert_eq!(result.current_price, dec!(15));
        assert_eq!(result.min_price, dec!(5));
        assert_eq!(result.max_price, dec!(20));
        assert_eq!(result.average_price, dec!(12.5));
        assert_eq!(result.suggested_buy_below, dec!(5.15));
        assert_eq!(result.suggested_sell_above, dec!(19.4));
    }

    #[test]
    fn test_empty_series_has_no_stats() {
        assert!(PriceSeries::default().stats().is_none());
    }

    #[test]
    fn test_single_point_series() {
        let stats = PriceSeries::from_closes(&[42.0]).stats().unwrap();
        assert!((stats.current - stats.min).abs() < f64::EPSILON);
        assert!((stats.max - stats.mean).abs() < f64::EPSILON);
    }

    #[test]
    fn test_round_price_half_up() {
        assert_eq!(round_price(0.125).unwrap(), dec!(0.13));
        assert_eq!(round_price(97_500.004_9).unwrap(), dec!(97500.00));
        assert_eq!(round_price(0.000_022).unwrap(), dec!(0.00));
        assert!(round_price(f64::NAN).is_err());
    }

    #[test]
    fn test_rounding_law_holds_for_all_fields() {
        let series = PriceSeries::from_closes(&[1.234_567, 9.876_543, 3.333_333, 7.777_777]);
        let stats = series.stats().unwrap();
        let result =
            AnalysisResult::from_stats("X".into(), Symbol::parse("X").unwrap(), 3, &stats).unwrap();

        for value in [
            result.current_price,
            result.min_price,
            result.max_price,
            result.average_price,
            result.suggested_buy_below,
            result.suggested_sell_above,
        ] {
            assert!(value.scale() <= PRICE_DP);
            assert_eq!(value, value.round_dp(PRICE_DP));
        }
    }

    #[test]
    fn test_serializes_as_flat_record() {
        let stats = PriceSeries::from_closes(&[10.0, 20.0, 5.0, 15.0]).stats().unwrap();
        let result =
            AnalysisResult::from_stats("Test".into(), Symbol::parse("tst").unwrap(), 3, &stats).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["coin"], "Test");
        assert_eq!(json["symbol"], "TST");
        assert_eq!(json["days"], 3);
        assert_eq!(json["data_points"], 4);
        assert_eq!(json["suggested_buy_below"], 5.15);
        assert_eq!(json["suggested_sell_above"], 19.4);
        assert!(json.as_object().unwrap().values().all(|v| !v.is_object() && !v.is_array()));
    }

    #[test]
    fn test_summary_format() {
        let stats = PriceSeries::from_closes(&[10.0, 20.0, 5.0, 15.0]).stats().unwrap();
        let result =
            AnalysisResult::from_stats("Solana".into(), Symbol::parse("SOL").unwrap(), 3, &stats).unwrap();
        let summary = result.summary();

        assert!(summary.starts_with("📊 Solana (SOL) – 3-Day Price Analysis"));
        assert!(summary.contains("- Current Price:   $15.00"));
        assert!(summary.contains("📉 Suggested Buy Below:  $5.15"));
        assert!(summary.contains("📈 Suggested Sell Above: $19.40"));
    }
}
