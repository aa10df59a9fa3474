use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/kb/package/:code — resolve a certificate or package code to its
/// deposit policy via progressive suffix stripping.
pub async fn package_lookup(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    match state.kb.resolve(&code) {
        Some((matched, policy)) => Ok(Json(json!({
            "found": true,
            "certificate_code": matched,
            "package_info": policy,
        }))),
        None => Err(AppError::NotFound(format!(
            "package deposit information for certificate code: {code}"
        ))),
    }
}
