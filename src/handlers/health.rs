use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "mode": if state.config.use_mock_store { "mock" } else { "caspio" },
        "packages": state.kb.len(),
        "active_calls": state.sessions.active_calls().len(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
