//! Application State

use std::sync::Arc;

use agent_core::ToolRegistry;
use crypto_predictor::CryptoPredictor;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Resolver + analyzer used by the direct predict endpoint
    pub predictor: Arc<CryptoPredictor>,

    /// Tool registry with all available tools
    pub tools: Arc<ToolRegistry>,
}
