use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use super::{AlertPayload, Notifier};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts call alerts to a Google Chat space via its incoming webhook. The
/// thread key keeps one call's messages in one chat thread.
pub struct GoogleChatNotifier {
    webhook_url: String,
    client: reqwest::Client,
}

impl GoogleChatNotifier {
    pub fn new(webhook_url: String) -> Self {
        Self {
            webhook_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for GoogleChatNotifier {
    async fn send_alert(&self, thread_key: &str, payload: &AlertPayload) -> anyhow::Result<()> {
        if self.webhook_url.is_empty() {
            tracing::warn!("chat webhook URL not configured, dropping alert");
            return Ok(());
        }

        let body = serde_json::json!({ "text": render_text(payload) });

        self.client
            .post(&self.webhook_url)
            .query(&[("threadKey", thread_key)])
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .context("failed to reach chat webhook")?
            .error_for_status()
            .context("chat webhook rejected the message")?;

        Ok(())
    }
}

fn render_text(payload: &AlertPayload) -> String {
    match payload {
        AlertPayload::CallStarted {
            customer,
            agent_name,
        } => {
            let name = customer.name.as_deref().unwrap_or("Unknown");
            let phone = customer.phone.as_deref().unwrap_or("Unknown");
            let email = customer.email.as_deref().unwrap_or("Not provided");
            format!(
                "*LIVE CALL IN PROGRESS*\nAgent: {agent_name}\nCustomer: {name}\nPhone: {phone}\nEmail: {email}"
            )
        }
        AlertPayload::Transcript {
            speaker,
            text,
            timestamp,
        } => format!("*{}* ({timestamp}):\n{text}", speaker.label()),
        AlertPayload::CallEnded {
            outcome,
            duration_secs,
            customer_name,
        } => {
            let customer = customer_name.as_deref().unwrap_or("Unknown");
            format!(
                "*Call ended* — {outcome} after {} ({customer})",
                format_duration(*duration_secs)
            )
        }
        AlertPayload::TakeoverRequested { requester } => {
            format!("*{requester}* has requested to take over the call. Transfer initiated...")
        }
    }
}

fn format_duration(seconds: i64) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    if mins > 0 {
        format!("{mins}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CustomerSnapshot;
    use crate::services::notify::Speaker;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(205), "3m 25s");
    }

    #[test]
    fn test_call_started_includes_snapshot() {
        let text = render_text(&AlertPayload::CallStarted {
            customer: CustomerSnapshot {
                name: Some("Sarah Johnson".to_string()),
                phone: Some("+18182121359".to_string()),
                email: None,
            },
            agent_name: "Travel Concierge".to_string(),
        });
        assert!(text.contains("Sarah Johnson"));
        assert!(text.contains("+18182121359"));
        assert!(text.contains("Not provided"));
    }

    #[test]
    fn test_transcript_labels_speaker() {
        let text = render_text(&AlertPayload::Transcript {
            speaker: Speaker::Agent,
            text: "How can I help?".to_string(),
            timestamp: "2025-03-01T10:00:00Z".to_string(),
        });
        assert!(text.starts_with("*Agent*"));
    }
}
