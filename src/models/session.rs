use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Customer identity captured once at call start and echoed on every alert
/// for the call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// One active call's live-monitoring state. Held in process memory only;
/// durability across restarts is out of scope.
#[derive(Debug, Clone, Serialize)]
pub struct CallSession {
    pub call_id: String,
    pub thread_key: String,
    pub customer: CustomerSnapshot,
    pub started_at: DateTime<Utc>,
    pub transcript_count: u32,
}
