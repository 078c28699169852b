//! Predict Crypto Tool
//!
//! Price statistics and buy/sell thresholds for any coin by name.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    AgentError, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
    tool::ParameterSchema,
};

use crate::predictor::CryptoPredictor;

const NAME: &str = "predict_crypto";

/// Tool wrapping `CryptoPredictor::predict_any_crypto`
pub struct PredictCryptoTool {
    predictor: Arc<CryptoPredictor>,
}

impl PredictCryptoTool {
    pub fn new(predictor: Arc<CryptoPredictor>) -> Self {
        Self { predictor }
    }
}

#[async_trait]
impl Tool for PredictCryptoTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Analyze a cryptocurrency's daily closing prices over the last N days. Returns current, lowest, highest and average price plus suggested buy-below and sell-above levels.".into(),
            parameters: vec![
                ParameterSchema::required(
                    "coin",
                    "string",
                    "Coin name (e.g., 'bitcoin', 'solana', 'dogecoin')",
                ),
                ParameterSchema::required(
                    "days",
                    "integer",
                    "Number of historical days to analyze (at least 1)",
                ),
            ],
            category: Some("market_data".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let coin = call
            .str_arg("coin")
            .ok_or_else(|| AgentError::ToolValidation("'coin' must be a string".into()))?;
        let days = call
            .i64_arg("days")
            .ok_or_else(|| AgentError::ToolValidation("'days' must be an integer".into()))?;

        match self.predictor.predict_any_crypto(coin, days).await {
            Ok(result) => {
                let data = serde_json::to_value(&result)?;
                Ok(ToolResult::success(NAME, result.summary()).with_data(data))
            }
            Err(e) => Ok(super::failure(NAME, &e)),
        }
    }
}
