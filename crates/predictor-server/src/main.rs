//! crypto-predictor HTTP Server
//!
//! Axum-based server exposing the predictor tools to agent frameworks and a
//! direct analysis endpoint.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{AddTool, SubtractTool, ToolRegistry};
use crypto_predictor::{CryptoPredictor, PredictorConfig, register_tools};

use crate::handlers::{call_tool, health_check, list_tools, predict};
use crate::state::AppState;

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/tools", get(list_tools))
        .route("/api/tools/call", post(call_tool))
        .route("/api/predict", get(predict))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_state(config: &PredictorConfig) -> anyhow::Result<AppState> {
    let predictor = Arc::new(CryptoPredictor::from_config(config)?);

    let mut tools = ToolRegistry::new();
    tools.register(AddTool);
    tools.register(SubtractTool);
    register_tools(&mut tools, &predictor);

    Ok(AppState {
        predictor,
        tools: Arc::new(tools),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PredictorConfig::from_env()?;
    tracing::info!(
        data_source = config.data_source.as_str(),
        quote_currency = %config.quote_currency,
        timeout_secs = config.timeout_secs,
        "Predictor configured"
    );

    let state = build_state(&config)?;
    tracing::info!("Registered {} tools:", state.tools.len());
    for name in state.tools.names() {
        tracing::info!("  • {}", name);
    }

    let app = build_router(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("crypto-predictor server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  GET  /api/tools       - Tool schemas");
    tracing::info!("  POST /api/tools/call  - Invoke a tool");
    tracing::info!("  GET  /api/predict     - Analyze ?coin=<name>&days=<n>");

    axum::serve(listener, app).await?;

    Ok(())
}
