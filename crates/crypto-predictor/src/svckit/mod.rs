//! Service Kit - Agent Tools
//!
//! Domain-specific tools that implement `agent_core::Tool` for the crypto predictor.

mod predict_crypto;
mod resolve_symbol;

pub use predict_crypto::PredictCryptoTool;
pub use resolve_symbol::ResolveSymbolTool;

use agent_core::ToolResult;

use crate::error::PredictorError;

/// Failed tool result carrying the typed error code
fn failure(tool: &str, err: &PredictorError) -> ToolResult {
    tracing::warn!(tool, kind = err.kind(), "Tool call failed: {}", err);
    ToolResult::failure(tool, err.user_message()).with_data(serde_json::json!({
        "error": err.kind(),
        "message": err.to_string(),
    }))
}
