use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::errors::AppError;
use crate::models::NewMemo;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateMemoRequest {
    pub memo_type: Option<String>,
    pub details: Option<String>,
    pub customer_id: Option<String>,
    pub phone_number: Option<String>,
}

/// POST /api/memos
pub async fn create_memo(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateMemoRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let memo_type = body.memo_type.unwrap_or_default().trim().to_string();
    let customer_id = body.customer_id.unwrap_or_default().trim().to_string();
    if memo_type.is_empty() || customer_id.is_empty() {
        return Err(AppError::Validation(
            "memo_type and customer_id are required".to_string(),
        ));
    }

    let memo = NewMemo {
        memo_type,
        details: body.details.unwrap_or_default(),
        customer_id,
        phone_number: body.phone_number,
    };

    let memo_id = state.store.create_memo(&memo).await.map_err(|e| {
        tracing::error!(error = %e, customer_id = %memo.customer_id, "memo creation failed");
        AppError::Store(e.to_string())
    })?;

    Ok(Json(json!({
        "success": true,
        "message": "Memo created successfully",
        "memo_id": memo_id,
    })))
}

/// GET /api/memos/:customer_id
pub async fn list_memos(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let memos = state
        .store
        .memos_for_customer(&customer_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, customer_id = %customer_id, "memo listing failed");
            AppError::Store(e.to_string())
        })?;

    Ok(Json(json!({
        "customer_id": customer_id,
        "memo_count": memos.len(),
        "memos": memos,
    })))
}
