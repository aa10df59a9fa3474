use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::errors::AppError;
use crate::models::{ActivationMethod, CustomerRecord, DepositState, TravelRepState};
use crate::services::status::{booking, deposits, travel_rep};
use crate::state::AppState;

/// The stateless logic endpoints take a raw customer row, so the voice
/// platform can chain a lookup call into a check call without this service
/// holding any per-call state.
#[derive(Deserialize)]
pub struct LogicRequest {
    pub customer_data: Option<serde_json::Value>,
}

fn record_from(body: LogicRequest) -> Result<CustomerRecord, AppError> {
    let row = body
        .customer_data
        .ok_or_else(|| AppError::Validation("customer_data is required".to_string()))?;
    Ok(CustomerRecord::from_row(&row))
}

/// POST /api/logic/deposits-check
pub async fn deposits_check(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LogicRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let record = record_from(body)?;
    let policy = state
        .kb
        .resolve(record.resolution_code())
        .map(|(_, policy)| policy);

    let result = deposits::evaluate(
        record.validation_deposit,
        record.confirmation_deposit,
        policy.as_ref(),
    );

    let (message, next_action) = match result.state {
        DepositState::UnknownPackage => (
            "Package deposit amount not configured".to_string(),
            "none",
        ),
        DepositState::None => (
            "No deposits received".to_string(),
            match policy.map(|p| p.activation) {
                Some(ActivationMethod::Mail) => "ask_if_mailed",
                _ => "direct_to_website",
            },
        ),
        DepositState::Complete => (
            "Deposits complete - ready to schedule travel".to_string(),
            "transfer_to_scheduling",
        ),
        DepositState::Partial => (
            format!("Partial payment received. Remaining: ${}", result.remaining),
            "provide_payment_info",
        ),
    };

    Ok(Json(json!({
        "status": result.state,
        "message": message,
        "next_action": next_action,
        "deposits": {
            "validation_deposit": record.validation_deposit,
            "confirmation_deposit": record.confirmation_deposit,
            "total_paid": result.total_paid,
            "expected_deposit": result.expected,
            "remaining": result.remaining,
        },
        "activation_method": policy.map(|p| p.activation),
    })))
}

/// POST /api/logic/travel-rep-check — reports the window state and, where a
/// memo is warranted, the memo the agent should file. Writing it is the
/// memo endpoint's job.
pub async fn travel_rep_check(
    Json(body): Json<LogicRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let record = record_from(body)?;
    let today = Utc::now().date_naive();

    let result = travel_rep::evaluate(
        record.travel_date,
        &record.confirm_status,
        &record.travel_rep,
        record.docs_sent_date,
        today,
    );

    let days = result.days_remaining.unwrap_or_default();
    let travel_date = record
        .travel_date
        .map(|d| d.to_string())
        .unwrap_or_default();

    let response = match result.state {
        TravelRepState::NoDate => json!({
            "status": result.state,
            "message": "No travel date assigned yet",
            "action": "none",
        }),
        TravelRepState::PastDate => json!({
            "status": result.state,
            "message": "Travel date has passed",
            "days_remaining": days,
            "action": "none",
        }),
        TravelRepState::NotConfirmed => json!({
            "status": result.state,
            "message": "Trip not confirmed yet",
            "action": "none",
        }),
        TravelRepState::NeedsUrgent => json!({
            "status": result.state,
            "message": format!("Travel date in {days} days - Travel Rep assignment urgent"),
            "days_remaining": days,
            "action": "create_memo",
            "memo_type": "needs tr assignment",
            "memo_details": format!("Travel date: {travel_date}, Days remaining: {days}"),
        }),
        TravelRepState::NormalWindow => json!({
            "status": result.state,
            "message": format!("Travel date in {days} days - normal assignment window"),
            "days_remaining": days,
            "action": "none",
        }),
        TravelRepState::TooEarly => json!({
            "status": result.state,
            "message": format!("Travel date in {days} days - too early for assignment"),
            "days_remaining": days,
            "action": "none",
        }),
        TravelRepState::AssignedNoDocs => json!({
            "status": result.state,
            "message": format!(
                "Travel Rep {} assigned but hasn't sent documents",
                record.travel_rep
            ),
            "travel_rep_name": record.travel_rep,
            "action": "create_memo",
            "memo_type": "ask tr to call",
            "memo_details": format!(
                "Travel Rep: {}, Customer: {}",
                record.travel_rep, record.primary_phone
            ),
        }),
        TravelRepState::Complete => json!({
            "status": result.state,
            "message": format!(
                "Travel Rep {} assigned and documents sent on {}",
                record.travel_rep,
                record.docs_sent_date.map(|d| d.to_string()).unwrap_or_default()
            ),
            "travel_rep_name": record.travel_rep,
            "docs_sent_date": record.docs_sent_date,
            "action": "contact_tr_directly",
        }),
        // The engine never emits the legacy collapsed state.
        TravelRepState::NotNeeded => json!({
            "status": result.state,
            "action": "none",
        }),
    };

    Ok(Json(response))
}

/// POST /api/logic/booking-check
pub async fn booking_check(
    Json(body): Json<LogicRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let record = record_from(body)?;
    let result = booking::evaluate(&record.flight_booking, &record.hotel_booking);

    let response = match result.state {
        crate::models::BookingState::NotBooked => json!({
            "status": result.state,
            "message": "Customer has not booked travel yet",
            "action": "none",
        }),
        crate::models::BookingState::Booked => json!({
            "status": result.state,
            "message": "Customer is booked",
            "booking_refs": {
                "flight": result.flight_ref,
                "hotel": result.hotel_ref,
            },
            "action": "ask_about_itinerary",
        }),
    };

    Ok(Json(response))
}
