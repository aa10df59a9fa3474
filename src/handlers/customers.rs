use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::errors::AppError;
use crate::models::StatusReport;
use crate::services::status::{self, CustomerKey};
use crate::services::store::normalize_phone;
use crate::state::AppState;

fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}

#[derive(Deserialize)]
pub struct PhoneLookupRequest {
    pub phone_number: Option<String>,
}

/// POST /api/customers/phone-lookup — match against either phone on file.
pub async fn phone_lookup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PhoneLookupRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let phone = required(body.phone_number, "phone_number is required")?;
    let digits = normalize_phone(&phone);

    let customer = state.store.find_by_phone(&digits).await.map_err(|e| {
        tracing::error!(error = %e, "phone lookup failed");
        AppError::Store(e.to_string())
    })?;

    Ok(Json(match customer {
        Some(customer) => json!({ "found": true, "customer": customer }),
        None => json!({ "found": false, "message": "Customer not found" }),
    }))
}

#[derive(Deserialize)]
pub struct CertificateLookupRequest {
    pub certificate_number: Option<String>,
}

/// POST /api/customers/certificate-lookup
pub async fn certificate_lookup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CertificateLookupRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let code = required(body.certificate_number, "certificate_number is required")?;

    let customer = state.store.find_by_certificate(&code).await.map_err(|e| {
        tracing::error!(error = %e, "certificate lookup failed");
        AppError::Store(e.to_string())
    })?;

    Ok(Json(match customer {
        Some(customer) => json!({ "found": true, "customer": customer }),
        None => json!({ "found": false, "message": "Certificate not found" }),
    }))
}

#[derive(Deserialize)]
pub struct StatusQuery {
    pub phone: Option<String>,
    pub certificate: Option<String>,
}

/// GET /api/customers/status — the one-call, all-status endpoint the voice
/// agent hits with the caller id.
pub async fn customer_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let nonblank = |v: Option<String>| {
        v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
    };

    let key = if let Some(phone) = nonblank(query.phone) {
        CustomerKey::Phone(phone)
    } else if let Some(certificate) = nonblank(query.certificate) {
        CustomerKey::Certificate(certificate)
    } else {
        return Err(AppError::Validation(
            "missing identifying parameter: provide one of phone, certificate".to_string(),
        ));
    };

    match status::resolve(state.store.as_ref(), &state.kb, &key).await? {
        Some(report) => Ok(Json(status_response(&report))),
        None => Ok(Json(json!({
            "found": false,
            "message": "Customer not found",
            "status": { "overall": "unknown", "category": "new_caller" },
        }))),
    }
}

fn status_response(report: &StatusReport) -> serde_json::Value {
    let customer = &report.customer;
    let scheduled = customer.travel_date.is_some();

    json!({
        "found": true,
        "status": {
            "overall": report.overall,
            "recommended_action": report.recommended_action,
            "agent_message": report.agent_message,
        },
        "customer": {
            "customer_id": customer.customer_id,
            "phone": format!("+1{}", customer.primary_phone),
            "email": customer.email,
            "first_name": customer.first_name,
            "last_name": customer.last_name,
            "full_name": customer.full_name(),
        },
        "certificate": {
            "certificate_number": customer.certificate_number,
            "package_type": customer.package_code,
            "matched_package": report.matched_package,
            "confirmation_status": customer.confirm_status,
        },
        "deposits": {
            "state": report.deposit.state,
            "validation_deposit": customer.validation_deposit,
            "confirmation_deposit": customer.confirmation_deposit,
            "total_paid": report.deposit.total_paid,
            "expected_deposit": report.deposit.expected,
            "remaining": report.deposit.remaining,
            "activation_method": report.activation,
        },
        "travel_rep": {
            "state": report.travel_rep.state,
            "name": (!customer.travel_rep.is_empty()).then(|| customer.travel_rep.clone()),
            "documents_sent": customer.docs_sent_date.is_some(),
            "docs_date": customer.docs_sent_date,
        },
        "travel_dates": {
            "scheduled": scheduled,
            "start_date": customer.travel_date,
            "days_until_travel": report.travel_rep.days_remaining,
        },
        "booking": {
            "is_booked": report.booking.state == crate::models::BookingState::Booked,
            "flight_booking": report.booking.flight_ref,
            "hotel_booking": report.booking.hotel_ref,
        },
    })
}
