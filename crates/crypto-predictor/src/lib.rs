//! # crypto-predictor
//!
//! Descriptive price analysis for any cryptocurrency, exposed as agent tools.
//!
//! ## Flow
//!
//! ```text
//! ┌────────────┐   "solana"   ┌────────────────┐   SOL, 7   ┌───────────────┐
//! │  Tool call │─────────────▶│ SymbolResolver │───────────▶│ PriceAnalyzer │
//! │ coin, days │              │  CoinSearch    │            │  PriceHistory │
//! └────────────┘              │  MatchRanking  │            └───────┬───────┘
//!                             └────────────────┘                    │
//!                                                                   ▼
//!         AnalysisResult { current, min, max, average, buy_below, sell_above }
//! ```
//!
//! Thresholds are fixed offsets of the window: buy below `min × 1.03`, sell
//! above `max × 0.97`. They describe the window; they do not predict it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use crypto_predictor::{CryptoPredictor, PredictorConfig};
//!
//! let predictor = CryptoPredictor::from_config(&PredictorConfig::from_env()?)?;
//! let result = predictor.predict_any_crypto("solana", 7).await?;
//! println!("{}", result.summary());
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod market;
pub mod model;
pub mod predictor;
pub mod resolver;
pub mod svckit;

use std::sync::Arc;

use agent_core::ToolRegistry;

pub use analyzer::PriceAnalyzer;
pub use config::{DataSource, PredictorConfig, RankingMode};
pub use error::{PredictorError, Result};
pub use model::{AnalysisResult, CoinMatch, CoinName, PriceSeries, Symbol};
pub use predictor::CryptoPredictor;
pub use resolver::{ExactMatch, FirstMatch, MatchRanking, SymbolResolver};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{PredictCryptoTool, ResolveSymbolTool};
}

/// Register every predictor tool on `registry`
pub fn register_tools(registry: &mut ToolRegistry, predictor: &Arc<CryptoPredictor>) {
    registry.register(tools::PredictCryptoTool::new(predictor.clone()));
    registry.register(tools::ResolveSymbolTool::new(predictor.clone()));
}
