use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::errors::AppError;
use crate::models::{LeadRecord, LeadSource};
use crate::services::messaging::format_e164;
use crate::state::AppState;

/// Consent arrives as a bool from some forms and as the string "true" from
/// others; anything else means no consent.
fn consent_granted(value: Option<&serde_json::Value>) -> bool {
    match value {
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::String(s)) => s == "true",
        _ => false,
    }
}

fn new_lead_id() -> String {
    format!("tb{}", Utc::now().timestamp_millis())
}

fn nonblank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn save_lead(state: &AppState, lead: &LeadRecord) -> Result<(), AppError> {
    state.store.create_lead(lead).await.map_err(|e| {
        tracing::error!(error = %e, lead_id = %lead.lead_id, "failed to save lead");
        AppError::Store(e.to_string())
    })
}

#[derive(Deserialize)]
pub struct GoogleLeadForm {
    pub lead_id: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub destination: Option<String>,
    pub travel_timeline: Option<String>,
    pub travelers_count: Option<String>,
    pub budget_range: Option<String>,
    pub consent_given: Option<serde_json::Value>,
    pub campaign_id: Option<String>,
    pub campaign_name: Option<String>,
}

/// POST /webhooks/leads/google — Google Ads lead form submissions. Leads
/// without consent are acknowledged but never stored.
pub async fn google_lead(
    State(state): State<Arc<AppState>>,
    Json(form): Json<GoogleLeadForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (Some(full_name), Some(phone), Some(email)) = (
        nonblank(form.full_name),
        nonblank(form.phone),
        nonblank(form.email),
    ) else {
        return Err(AppError::Validation(
            "missing required fields: full_name, phone, email".to_string(),
        ));
    };

    if !consent_granted(form.consent_given.as_ref()) {
        tracing::info!("lead rejected - no consent given");
        return Ok(Json(json!({
            "success": false,
            "message": "Lead rejected - no consent given",
        })));
    }

    let lead = LeadRecord {
        lead_id: form.lead_id.unwrap_or_else(new_lead_id),
        customer_name: full_name,
        phone: format_e164(&phone),
        email,
        destination: form.destination.unwrap_or_default(),
        travel_dates: form.travel_timeline.unwrap_or_default(),
        travelers_count: form.travelers_count.unwrap_or_default(),
        budget_range: form.budget_range.unwrap_or_default(),
        source: LeadSource::GoogleAds,
        status: "callback_requested".to_string(),
        notes: format!(
            "Campaign: {} ({})",
            form.campaign_name.unwrap_or_default(),
            form.campaign_id.unwrap_or_default()
        ),
        consent_given: true,
        consent_timestamp: Utc::now(),
    };

    save_lead(&state, &lead).await?;
    tracing::info!(lead_id = %lead.lead_id, "google lead saved");

    Ok(Json(json!({ "success": true, "lead_id": lead.lead_id })))
}

#[derive(Deserialize)]
pub struct LandingPageForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub destination: Option<String>,
    pub travel_dates: Option<String>,
    pub travelers_count: Option<String>,
    pub budget_range: Option<String>,
    pub consent: Option<serde_json::Value>,
}

/// POST /webhooks/leads/landing-page — the landing page requires consent
/// up front, so a missing checkbox is a hard 400 here.
pub async fn landing_page_lead(
    State(state): State<Arc<AppState>>,
    Json(form): Json<LandingPageForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (Some(name), Some(phone), Some(email)) = (
        nonblank(form.name),
        nonblank(form.phone),
        nonblank(form.email),
    ) else {
        return Err(AppError::Validation(
            "missing required fields: name, phone, email".to_string(),
        ));
    };

    if !consent_granted(form.consent.as_ref()) {
        return Err(AppError::Validation("consent required".to_string()));
    }

    let lead = LeadRecord {
        lead_id: new_lead_id(),
        customer_name: name,
        phone: format_e164(&phone),
        email,
        destination: form.destination.unwrap_or_default(),
        travel_dates: form.travel_dates.unwrap_or_default(),
        travelers_count: form.travelers_count.unwrap_or_default(),
        budget_range: form.budget_range.unwrap_or_default(),
        source: LeadSource::LandingPage,
        status: "callback_requested".to_string(),
        notes: String::new(),
        consent_given: true,
        consent_timestamp: Utc::now(),
    };

    save_lead(&state, &lead).await?;
    tracing::info!(lead_id = %lead.lead_id, "landing page lead saved");

    Ok(Json(json!({
        "success": true,
        "lead_id": lead.lead_id,
        "message": "We're calling you now!",
    })))
}
