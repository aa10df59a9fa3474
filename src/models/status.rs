use serde::{Deserialize, Serialize};

use super::customer::CustomerRecord;
use super::package::ActivationMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositState {
    None,
    Partial,
    Complete,
    UnknownPackage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelRepState {
    /// Legacy collapsed form kept for feed consumers; the engine itself
    /// always reports one of the granular states below.
    NotNeeded,
    NoDate,
    PastDate,
    NotConfirmed,
    NeedsUrgent,
    NormalWindow,
    TooEarly,
    AssignedNoDocs,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingState {
    NotBooked,
    Booked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallState {
    ReadyToTravel,
    ReadyToSchedule,
    DepositsComplete,
    DepositsIncomplete,
    DepositsPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    VerifyItinerary,
    TransferToScheduling,
    OfferScheduling,
    CollectPayment,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepositStatus {
    pub state: DepositState,
    pub total_paid: f64,
    /// None when the package could not be resolved — unavailable, not zero.
    pub expected: Option<f64>,
    pub remaining: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TravelRepStatus {
    pub state: TravelRepState,
    pub days_remaining: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingCheck {
    pub state: BookingState,
    pub flight_ref: Option<String>,
    pub hotel_ref: Option<String>,
}

/// The aggregator's output. Recomputed on every request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub customer: CustomerRecord,
    pub matched_package: Option<String>,
    pub activation: Option<ActivationMethod>,
    pub deposit: DepositStatus,
    pub travel_rep: TravelRepStatus,
    pub booking: BookingCheck,
    pub overall: OverallState,
    pub recommended_action: RecommendedAction,
    pub agent_message: String,
}
