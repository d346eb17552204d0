use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api/health
/// Reports service version, environment and whether the LLM credential is set.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let claude_api = if state.llm.is_configured() {
        "configured"
    } else {
        "not_configured"
    };

    Json(json!({
        "status": "healthy",
        "claude_api": claude_api,
        "environment": state.config.app_env,
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME")
    }))
}
