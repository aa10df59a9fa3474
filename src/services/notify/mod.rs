pub mod google_chat;

use async_trait::async_trait;
use serde::Serialize;

use crate::models::CustomerSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Agent,
    Customer,
}

impl Speaker {
    /// Transcript events label the agent side "agent"; everything else is
    /// the customer.
    pub fn from_role(role: &str) -> Self {
        if role.eq_ignore_ascii_case("agent") {
            Speaker::Agent
        } else {
            Speaker::Customer
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Speaker::Agent => "Agent",
            Speaker::Customer => "Customer",
        }
    }
}

/// What gets posted to a call's notification thread. Rendering is the
/// notifier's concern; the tracker only decides which event to send.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AlertPayload {
    CallStarted {
        customer: CustomerSnapshot,
        agent_name: String,
    },
    Transcript {
        speaker: Speaker,
        text: String,
        timestamp: String,
    },
    CallEnded {
        outcome: String,
        duration_secs: i64,
        customer_name: Option<String>,
    },
    TakeoverRequested {
        requester: String,
    },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_alert(&self, thread_key: &str, payload: &AlertPayload) -> anyhow::Result<()>;
}
