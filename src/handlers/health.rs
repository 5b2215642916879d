use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health - Liveness check with registry size
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let users = state.directory.len().await;

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "users": users,
        "timestamp": chrono::Utc::now(),
    }))
}
