use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A follow-up note on a customer's file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memo {
    pub id: String,
    pub memo_type: String,
    pub details: String,
    pub customer_id: String,
    pub phone_number: String,
    pub created_date: NaiveDate,
    pub created_by: String,
}

/// Memo creation request, before the store assigns an id and stamps it.
#[derive(Debug, Clone)]
pub struct NewMemo {
    pub memo_type: String,
    pub details: String,
    pub customer_id: String,
    pub phone_number: Option<String>,
}
