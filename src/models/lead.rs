use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    GoogleAds,
    LandingPage,
}

/// A consent-gated lead captured from an ad or landing-page form. Leads
/// without recorded consent never reach the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRecord {
    pub lead_id: String,
    pub customer_name: String,
    pub phone: String,
    pub email: String,
    pub destination: String,
    pub travel_dates: String,
    pub travelers_count: String,
    pub budget_range: String,
    pub source: LeadSource,
    pub status: String,
    pub notes: String,
    pub consent_given: bool,
    pub consent_timestamp: DateTime<Utc>,
}

/// Partial update applied to an existing lead; None fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct LeadUpdate {
    pub status: Option<String>,
    pub payment_link_status: Option<String>,
    pub payment_link_url: Option<String>,
    pub sms_message_sid: Option<String>,
}
