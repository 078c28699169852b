//! Resolve Symbol Tool

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    AgentError, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
    tool::ParameterSchema,
};

use crate::predictor::CryptoPredictor;

const NAME: &str = "resolve_symbol";

/// Tool mapping a coin name to its ticker symbol
pub struct ResolveSymbolTool {
    predictor: Arc<CryptoPredictor>,
}

impl ResolveSymbolTool {
    pub fn new(predictor: Arc<CryptoPredictor>) -> Self {
        Self { predictor }
    }
}

#[async_trait]
impl Tool for ResolveSymbolTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Look up the exchange ticker symbol for a cryptocurrency name.".into(),
            parameters: vec![ParameterSchema::required(
                "coin",
                "string",
                "Coin name (e.g., 'solana')",
            )],
            category: Some("market_data".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let coin = call
            .str_arg("coin")
            .ok_or_else(|| AgentError::ToolValidation("'coin' must be a string".into()))?;

        match self.predictor.resolve(coin).await {
            Ok(symbol) => Ok(ToolResult::success(NAME, symbol.as_str())
                .with_data(serde_json::json!({ "symbol": symbol }))),
            Err(e) => Ok(super::failure(NAME, &e)),
        }
    }
}
