//! Error Types for Crypto Predictor

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PredictorError>;

/// Terminal failures of a resolve/analyze call. No variant carries a partial
/// result.
#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Coin symbol for '{0}' not found")]
    SymbolNotFound(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No price history returned for {0}")]
    EmptySeries(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PredictorError {
    /// Stable snake_case code used in tool results and HTTP bodies
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::SymbolNotFound(_) => "symbol_not_found",
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::MalformedResponse(_) => "malformed_response",
            Self::EmptySeries(_) => "empty_series",
            Self::Config(_) => "config",
        }
    }

    /// Message suitable for relaying to an end user
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidArgument(msg) => format!("Invalid request: {msg}"),
            Self::SymbolNotFound(coin) => format!("Could not find a coin named '{coin}'."),
            Self::UpstreamUnavailable(_) => {
                "The market data service is currently unavailable. Please try again.".into()
            }
            Self::MalformedResponse(_) | Self::EmptySeries(_) => {
                "The market data service returned unusable data.".into()
            }
            Self::Config(msg) => format!("Service misconfigured: {msg}"),
        }
    }
}

impl From<reqwest::Error> for PredictorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::UpstreamUnavailable(format!("request timeout: {err}"))
        } else if err.is_connect() {
            Self::UpstreamUnavailable(format!("connection failed: {err}"))
        } else if err.is_decode() {
            Self::UpstreamUnavailable(format!("failed to read response body: {err}"))
        } else {
            Self::UpstreamUnavailable(format!("request failed: {err}"))
        }
    }
}
