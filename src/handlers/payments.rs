use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::errors::AppError;
use crate::models::LeadUpdate;
use crate::services::messaging::format_e164;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PaymentSmsRequest {
    pub lead_id: Option<String>,
    pub phone: Option<String>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub amount: Option<f64>,
}

/// POST /webhooks/send-payment-sms — called by the voice agent once a
/// customer accepts the planning fee. Builds a prefilled payment URL, texts
/// it out, and marks the lead accordingly either way.
pub async fn send_payment_sms(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PaymentSmsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let nonblank = |v: Option<String>| {
        v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
    };
    let (Some(lead_id), Some(phone), Some(customer_name), Some(email)) = (
        nonblank(body.lead_id),
        nonblank(body.phone),
        nonblank(body.customer_name),
        nonblank(body.email),
    ) else {
        return Err(AppError::Validation(
            "missing required fields: lead_id, phone, customer_name, email".to_string(),
        ));
    };

    if state.config.payment_page_url.is_empty() {
        return Err(AppError::Config(
            "CASPIO_PAYMENT_URL is not configured".to_string(),
        ));
    }

    let payment_url = payment_url(
        &state.config.payment_page_url,
        &lead_id,
        &customer_name,
        &email,
    );
    let to = format_e164(&phone);
    let message = payment_sms_body(&customer_name, &payment_url, body.amount);

    match state.messaging.send_message(&to, &message).await {
        Ok(message_sid) => {
            let update = LeadUpdate {
                status: Some("payment_link_sent".to_string()),
                payment_link_status: Some("sent".to_string()),
                payment_link_url: Some(payment_url.clone()),
                sms_message_sid: Some(message_sid.clone()),
            };
            if let Err(e) = state.store.update_lead(&lead_id, &update).await {
                tracing::error!(error = %e, lead_id = %lead_id, "failed to record payment link send");
            }

            tracing::info!(lead_id = %lead_id, to = %to, "payment link sent");
            Ok(Json(json!({
                "success": true,
                "message_sid": message_sid,
                "payment_url": payment_url,
                "result": format!("Payment link sent successfully to {to}"),
            })))
        }
        Err(e) => {
            tracing::error!(error = %e, lead_id = %lead_id, "payment link SMS failed");
            let update = LeadUpdate {
                payment_link_status: Some("sms_failed".to_string()),
                ..Default::default()
            };
            if let Err(e) = state.store.update_lead(&lead_id, &update).await {
                tracing::error!(error = %e, lead_id = %lead_id, "failed to record SMS failure");
            }

            Err(AppError::Messaging(format!(
                "failed to send payment link: {e}"
            )))
        }
    }
}

fn payment_url(base: &str, lead_id: &str, customer_name: &str, email: &str) -> String {
    let params = [
        ("lead_id", lead_id),
        ("name", customer_name),
        ("email", email),
    ];
    match reqwest::Url::parse_with_params(base, &params) {
        Ok(url) => url.to_string(),
        Err(_) => base.to_string(),
    }
}

fn payment_sms_body(customer_name: &str, payment_url: &str, amount: Option<f64>) -> String {
    let amount_line = amount
        .map(|a| format!("\n\nAmount: ${a}"))
        .unwrap_or_default();
    format!(
        "Hi {customer_name}!\n\n\
         Complete your planning fee payment here:\n\n\
         {payment_url}{amount_line}\n\n\
         This secure link will take you to our payment page. Once completed, \
         your travel specialist will be in touch within 24 hours."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_url_encodes_params() {
        let url = payment_url(
            "https://example.caspio.com/dp/abc123/payment",
            "tb263421",
            "John Smith",
            "john@example.com",
        );
        assert!(url.contains("lead_id=tb263421"));
        assert!(url.contains("name=John+Smith") || url.contains("name=John%20Smith"));
        assert!(url.contains("email=john%40example.com"));
    }

    #[test]
    fn test_sms_body_includes_amount_when_present() {
        let body = payment_sms_body("John", "https://pay.example.com", Some(149.0));
        assert!(body.contains("Hi John!"));
        assert!(body.contains("Amount: $149"));

        let body = payment_sms_body("John", "https://pay.example.com", None);
        assert!(!body.contains("Amount:"));
    }
}
