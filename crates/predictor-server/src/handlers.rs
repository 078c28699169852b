//! HTTP Handlers

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use agent_core::{AgentError, ToolCall, ToolResult};
use crypto_predictor::{AnalysisResult, PredictorError};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub data_source: &'static str,
    pub tools: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    pub coin: String,
    pub days: i64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn predictor_error(err: &PredictorError) -> ApiError {
    let status = match err {
        PredictorError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        PredictorError::SymbolNotFound(_) => StatusCode::NOT_FOUND,
        PredictorError::UpstreamUnavailable(_)
        | PredictorError::MalformedResponse(_)
        | PredictorError::EmptySeries(_) => StatusCode::BAD_GATEWAY,
        PredictorError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: err.kind().to_uppercase(),
        }),
    )
}

fn agent_error(err: &AgentError) -> ApiError {
    let status = match err {
        AgentError::ToolNotFound(_) => StatusCode::NOT_FOUND,
        AgentError::ToolValidation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: err.code().into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        data_source: state.predictor.data_source().as_str(),
        tools: state.tools.names().into_iter().map(String::from).collect(),
    })
}

/// Tool schemas for function-calling bindings
pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolDescriptor>> {
    let tools = state
        .tools
        .schemas()
        .into_iter()
        .map(|schema| ToolDescriptor {
            parameters: schema.to_json_schema(),
            name: schema.name,
            description: schema.description,
            category: schema.category,
        })
        .collect();
    Json(tools)
}

/// Invoke a registered tool
pub async fn call_tool(
    State(state): State<AppState>,
    Json(call): Json<ToolCall>,
) -> Result<Json<ToolResult>, ApiError> {
    state.tools.execute(&call).await.map(Json).map_err(|e| {
        tracing::warn!(tool = %call.name, "Tool call rejected: {}", e);
        agent_error(&e)
    })
}

/// Direct analysis: `GET /api/predict?coin=solana&days=7`
pub async fn predict(
    State(state): State<AppState>,
    query: Result<Query<PredictQuery>, QueryRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::warn!("Rejected predict query: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: rejection.body_text(),
                code: "INVALID_ARGUMENT".into(),
            }),
        )
    })?;

    state
        .predictor
        .predict_any_crypto(&query.coin, query.days)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!(coin = %query.coin, days = query.days, "Prediction failed: {}", e);
            predictor_error(&e)
        })
}
