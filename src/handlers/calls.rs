use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::json;
use sha1::Sha1;

use crate::models::CustomerSnapshot;
use crate::services::calls::TakeoverOutcome;
use crate::services::notify::Speaker;
use crate::state::AppState;

fn compute_signature(secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

/// Call webhooks carry an HMAC-SHA1 of the raw body in X-Webhook-Signature.
/// Verification is skipped when no secret is configured — dev mode.
fn reject_unsigned(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Option<Response> {
    let secret = &state.config.call_webhook_secret;
    if secret.is_empty() {
        return None;
    }

    let signature = headers
        .get("x-webhook-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if signature.is_empty() {
        tracing::warn!("missing X-Webhook-Signature header");
        return Some((StatusCode::FORBIDDEN, "Missing signature").into_response());
    }

    if compute_signature(secret, body).as_deref() != Some(signature) {
        tracing::warn!("invalid webhook signature");
        return Some((StatusCode::FORBIDDEN, "Invalid signature").into_response());
    }

    None
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message })),
    )
        .into_response()
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "malformed webhook body");
        bad_request("invalid JSON body")
    })
}

fn required_call_id(call_id: Option<String>) -> Result<String, Response> {
    call_id
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| bad_request("call_id is required"))
}

#[derive(Deserialize)]
pub struct CallStartedEvent {
    pub call_id: Option<String>,
    pub agent_name: Option<String>,
    #[serde(default)]
    pub customer: CustomerSnapshot,
    pub from_number: Option<String>,
}

/// POST /webhook/calls/started
pub async fn call_started(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(reject) = reject_unsigned(&state, &headers, &body) {
        return reject;
    }
    let event: CallStartedEvent = match parse_body(&body) {
        Ok(event) => event,
        Err(reject) => return reject,
    };
    let call_id = match required_call_id(event.call_id) {
        Ok(id) => id,
        Err(reject) => return reject,
    };

    let mut customer = event.customer;
    if customer.phone.is_none() {
        customer.phone = event.from_number;
    }

    let thread_key = state
        .sessions
        .call_started(
            &call_id,
            customer,
            event
                .agent_name
                .unwrap_or_else(|| "Travel Concierge".to_string()),
        )
        .await;

    Json(json!({ "success": true, "thread_key": thread_key })).into_response()
}

#[derive(Deserialize)]
pub struct TranscriptEntry {
    pub role: Option<String>,
    pub content: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Deserialize)]
pub struct TranscriptEvent {
    pub call_id: Option<String>,
    pub transcript: Option<serde_json::Value>,
}

/// POST /webhook/calls/transcript — accepts one entry or an array of them.
/// Updates for calls that are not active are acknowledged and dropped; the
/// sender is not penalized for ordering races.
pub async fn transcript_update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(reject) = reject_unsigned(&state, &headers, &body) {
        return reject;
    }
    let event: TranscriptEvent = match parse_body(&body) {
        Ok(event) => event,
        Err(reject) => return reject,
    };
    let call_id = match required_call_id(event.call_id) {
        Ok(id) => id,
        Err(reject) => return reject,
    };

    let entries = match event.transcript {
        Some(serde_json::Value::Array(items)) => items,
        Some(single) => vec![single],
        None => vec![],
    };

    let mut delivered = 0;
    for entry in entries {
        let Ok(entry) = serde_json::from_value::<TranscriptEntry>(entry) else {
            continue;
        };
        let speaker = Speaker::from_role(entry.role.as_deref().unwrap_or(""));
        let sent = state
            .sessions
            .transcript(
                &call_id,
                speaker,
                entry.content.unwrap_or_default(),
                entry.timestamp.unwrap_or_default(),
            )
            .await;
        if sent {
            delivered += 1;
        }
    }

    Json(json!({ "success": true, "delivered": delivered })).into_response()
}

#[derive(Deserialize)]
pub struct CallEndedEvent {
    pub call_id: Option<String>,
    pub outcome: Option<String>,
    pub end_reason: Option<String>,
}

/// POST /webhook/calls/ended
pub async fn call_ended(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(reject) = reject_unsigned(&state, &headers, &body) {
        return reject;
    }
    let event: CallEndedEvent = match parse_body(&body) {
        Ok(event) => event,
        Err(reject) => return reject,
    };
    let call_id = match required_call_id(event.call_id) {
        Ok(id) => id,
        Err(reject) => return reject,
    };

    let outcome = event
        .outcome
        .or(event.end_reason)
        .unwrap_or_else(|| "completed".to_string());

    let duration_secs = state.sessions.call_ended(&call_id, outcome).await;

    Json(json!({ "success": true, "duration_secs": duration_secs })).into_response()
}

#[derive(Deserialize)]
pub struct ChatAction {
    #[serde(rename = "actionMethodName")]
    pub action_method_name: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatParameter {
    pub key: Option<String>,
    pub value: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatUser {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatInteraction {
    pub action: Option<ChatAction>,
    pub parameters: Option<Vec<ChatParameter>>,
    pub user: Option<ChatUser>,
}

/// POST /webhook/chat/interaction — button callbacks from the chat space.
/// Responses are chat-rendered text, so this endpoint always answers 200.
pub async fn chat_interaction(
    State(state): State<Arc<AppState>>,
    Json(interaction): Json<ChatInteraction>,
) -> Json<serde_json::Value> {
    let method = interaction
        .action
        .and_then(|a| a.action_method_name)
        .unwrap_or_default();

    if method != "requestCallTakeover" {
        return Json(json!({ "text": "Action received" }));
    }

    let call_id = interaction
        .parameters
        .unwrap_or_default()
        .into_iter()
        .find(|p| p.key.as_deref() == Some("call_id"))
        .and_then(|p| p.value);

    let Some(call_id) = call_id else {
        return Json(json!({ "text": "Error: call_id not found" }));
    };

    let requester = interaction
        .user
        .and_then(|u| u.display_name)
        .unwrap_or_else(|| "Team Member".to_string());

    match state.sessions.takeover_requested(&call_id, &requester).await {
        TakeoverOutcome::Requested => Json(json!({
            "text": format!("Takeover requested by {requester}. Transferring call..."),
        })),
        TakeoverOutcome::NotActive => Json(json!({
            "text": "Call has already ended or is not active",
        })),
    }
}

/// GET /api/calls/active
pub async fn active_calls(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let now = chrono::Utc::now();
    let calls: Vec<serde_json::Value> = state
        .sessions
        .active_calls()
        .into_iter()
        .map(|session| {
            let duration = (now - session.started_at).num_seconds().max(0);
            json!({
                "call_id": session.call_id,
                "thread_key": session.thread_key,
                "customer": session.customer,
                "start_time": session.started_at,
                "transcript_count": session.transcript_count,
                "duration_secs": duration,
            })
        })
        .collect();

    Json(json!({
        "active_call_count": calls.len(),
        "calls": calls,
    }))
}
