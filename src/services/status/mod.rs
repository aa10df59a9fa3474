pub mod booking;
pub mod deposits;
pub mod travel_rep;

use chrono::{NaiveDate, Utc};

use crate::errors::AppError;
use crate::models::{
    BookingState, CustomerRecord, DepositState, NewMemo, OverallState, RecommendedAction,
    StatusReport, TravelRepState,
};
use crate::services::knowledge_base::KnowledgeBase;
use crate::services::store::{normalize_phone, RecordStore};

/// Identifying key a caller supplies to the status engine.
#[derive(Debug, Clone)]
pub enum CustomerKey {
    Phone(String),
    Certificate(String),
}

/// Full status resolution: fetch the record, run the evaluators, and raise
/// any follow-up memo the rep check calls for. Returns None for an unknown
/// caller — that is an answer, not an error.
pub async fn resolve(
    store: &dyn RecordStore,
    kb: &KnowledgeBase,
    key: &CustomerKey,
) -> Result<Option<StatusReport>, AppError> {
    let record = match key {
        CustomerKey::Phone(phone) => {
            let digits = normalize_phone(phone);
            store
                .find_by_phone(&digits)
                .await
                .map_err(|e| AppError::Store(e.to_string()))?
        }
        CustomerKey::Certificate(code) => store
            .find_by_certificate(code)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?,
    };

    let Some(record) = record else {
        return Ok(None);
    };

    let report = compose(&record, kb, Utc::now().date_naive());
    raise_follow_up_memo(store, &report).await;

    Ok(Some(report))
}

/// Pure composition of the three evaluators into one report. Deposit
/// completeness dominates the recommendation; booking and scheduling
/// sub-states only matter once deposits are settled.
pub fn compose(record: &CustomerRecord, kb: &KnowledgeBase, today: NaiveDate) -> StatusReport {
    let (matched_package, policy) = match kb.resolve(record.resolution_code()) {
        Some((code, policy)) => (Some(code), Some(policy)),
        None => (None, None),
    };

    let deposit = deposits::evaluate(
        record.validation_deposit,
        record.confirmation_deposit,
        policy.as_ref(),
    );
    let travel_rep = travel_rep::evaluate(
        record.travel_date,
        &record.confirm_status,
        &record.travel_rep,
        record.docs_sent_date,
        today,
    );
    let booking = booking::evaluate(&record.flight_booking, &record.hotel_booking);

    let has_future_travel_date = matches!(travel_rep.days_remaining, Some(d) if d >= 0);

    let (overall, recommended_action) = match deposit.state {
        DepositState::Complete if booking.state == BookingState::Booked => {
            (OverallState::ReadyToTravel, RecommendedAction::VerifyItinerary)
        }
        DepositState::Complete if has_future_travel_date => (
            OverallState::ReadyToSchedule,
            RecommendedAction::TransferToScheduling,
        ),
        DepositState::Complete => (
            OverallState::DepositsComplete,
            RecommendedAction::OfferScheduling,
        ),
        DepositState::Partial => (
            OverallState::DepositsIncomplete,
            RecommendedAction::CollectPayment,
        ),
        DepositState::None | DepositState::UnknownPackage => (
            OverallState::DepositsPending,
            RecommendedAction::CollectPayment,
        ),
    };

    let agent_message = agent_message(record, &deposit, overall, policy.as_ref());

    StatusReport {
        customer: record.clone(),
        matched_package,
        activation: policy.map(|p| p.activation),
        deposit,
        travel_rep,
        booking,
        overall,
        recommended_action,
        agent_message,
    }
}

fn agent_message(
    record: &CustomerRecord,
    deposit: &crate::models::DepositStatus,
    overall: OverallState,
    policy: Option<&crate::models::PackagePolicy>,
) -> String {
    use crate::models::ActivationMethod;

    match overall {
        OverallState::ReadyToTravel => {
            let rep = if record.travel_rep.trim().is_empty() {
                "being assigned".to_string()
            } else {
                record.travel_rep.clone()
            };
            format!(
                "Great news! Your deposits are complete and you're booked. \
                 Your travel rep is {rep}. Do you need your itinerary resent?"
            )
        }
        OverallState::ReadyToSchedule => "Your deposits are complete! You're all set to \
             schedule your travel dates. Would you like me to transfer you to our \
             scheduling team?"
            .to_string(),
        OverallState::DepositsComplete => "Your deposits are complete! You can now schedule \
             your travel dates. When would you like to travel?"
            .to_string(),
        OverallState::DepositsIncomplete => {
            let expected = deposit.expected.unwrap_or(0.0);
            format!(
                "I see you've paid ${} toward your ${} deposit. You have ${} remaining. \
                 Would you like to complete your payment today?",
                deposit.total_paid, expected, deposit.remaining
            )
        }
        OverallState::DepositsPending => match policy.map(|p| p.activation) {
            Some(ActivationMethod::Mail) => format!(
                "Your deposits haven't been received yet. Have you mailed in your \
                 activation form? The total deposit needed is ${}.",
                deposit.expected.unwrap_or(0.0)
            ),
            // Unknown packages get the online path, the common case.
            Some(ActivationMethod::Online) | None => {
                "Your deposits haven't been received yet. You can activate your \
                 certificate online at our website. Would you like me to send you \
                 the link?"
                    .to_string()
            }
        },
    }
}

/// needs_urgent and assigned_no_docs both call for a note on the customer's
/// file. Memo creation is best-effort here — the status was already
/// computed, so a store hiccup is logged rather than failing the request.
async fn raise_follow_up_memo(store: &dyn RecordStore, report: &StatusReport) {
    let record = &report.customer;
    let memo = match report.travel_rep.state {
        TravelRepState::NeedsUrgent => {
            let travel_date = record
                .travel_date
                .map(|d| d.to_string())
                .unwrap_or_default();
            Some(NewMemo {
                memo_type: "needs tr assignment".to_string(),
                details: format!(
                    "Travel date: {travel_date}, Days remaining: {}",
                    report.travel_rep.days_remaining.unwrap_or_default()
                ),
                customer_id: record.customer_id.clone(),
                phone_number: Some(record.primary_phone.clone()),
            })
        }
        TravelRepState::AssignedNoDocs => Some(NewMemo {
            memo_type: "ask tr to call".to_string(),
            details: format!(
                "Travel Rep: {}, Customer: {}",
                record.travel_rep, record.primary_phone
            ),
            customer_id: record.customer_id.clone(),
            phone_number: Some(record.primary_phone.clone()),
        }),
        _ => None,
    };

    if let Some(memo) = memo {
        match store.create_memo(&memo).await {
            Ok(id) => tracing::info!(
                memo_id = %id,
                customer_id = %memo.customer_id,
                memo_type = %memo.memo_type,
                "follow-up memo created"
            ),
            Err(e) => tracing::error!(
                error = %e,
                customer_id = %memo.customer_id,
                "failed to create follow-up memo"
            ),
        }
    }
}
