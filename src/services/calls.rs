use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::models::{CallSession, CustomerSnapshot};
use crate::services::notify::{AlertPayload, Notifier, Speaker};

/// Stable key correlating a call's chat messages into one thread.
pub fn thread_key(call_id: &str) -> String {
    format!("call-{call_id}")
}

#[derive(Debug, PartialEq, Eq)]
pub enum TakeoverOutcome {
    Requested,
    NotActive,
}

/// Tracks live calls from start to end and forwards each lifecycle event
/// to the notification thread. Sessions exist only in process memory; a
/// restart simply forgets in-flight calls.
///
/// All map mutations happen under one mutex, taken only for the mutation
/// itself — alerts are sent after the lock is released.
pub struct SessionTracker {
    sessions: Mutex<HashMap<String, CallSession>>,
    notifier: Arc<dyn Notifier>,
}

impl SessionTracker {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            notifier,
        }
    }

    /// Register a new call and announce it. A duplicate start for an id
    /// that is already active keeps the original session untouched.
    pub async fn call_started(
        &self,
        call_id: &str,
        customer: CustomerSnapshot,
        agent_name: String,
    ) -> String {
        let key = thread_key(call_id);

        {
            let mut sessions = self.sessions.lock().unwrap();
            if sessions.contains_key(call_id) {
                tracing::warn!(call_id = %call_id, "duplicate call-started event, keeping original session");
                return key;
            }
            sessions.insert(
                call_id.to_string(),
                CallSession {
                    call_id: call_id.to_string(),
                    thread_key: key.clone(),
                    customer: customer.clone(),
                    started_at: Utc::now(),
                    transcript_count: 0,
                },
            );
        }

        tracing::info!(call_id = %call_id, "call started");
        self.notify(
            &key,
            &AlertPayload::CallStarted {
                customer,
                agent_name,
            },
        )
        .await;

        key
    }

    /// Forward one transcript line. Events for unknown calls are ordering
    /// races from the webhook sender and are dropped with a warning.
    pub async fn transcript(
        &self,
        call_id: &str,
        speaker: Speaker,
        text: String,
        timestamp: String,
    ) -> bool {
        let key = {
            let mut sessions = self.sessions.lock().unwrap();
            match sessions.get_mut(call_id) {
                Some(session) => {
                    session.transcript_count += 1;
                    session.thread_key.clone()
                }
                None => {
                    tracing::warn!(call_id = %call_id, "transcript event for a call that is not active");
                    return false;
                }
            }
        };

        self.notify(
            &key,
            &AlertPayload::Transcript {
                speaker,
                text,
                timestamp,
            },
        )
        .await;

        true
    }

    /// Close out a call: announce the outcome with the elapsed duration and
    /// drop the session. Returns the duration, or None for an unknown id.
    pub async fn call_ended(&self, call_id: &str, outcome: String) -> Option<i64> {
        let session = { self.sessions.lock().unwrap().remove(call_id) };

        let Some(session) = session else {
            tracing::warn!(call_id = %call_id, "call-ended event for a call that is not active");
            return None;
        };

        let duration_secs = (Utc::now() - session.started_at).num_seconds().max(0);
        tracing::info!(call_id = %call_id, duration_secs, "call ended");

        self.notify(
            &session.thread_key,
            &AlertPayload::CallEnded {
                outcome,
                duration_secs,
                customer_name: session.customer.name.clone(),
            },
        )
        .await;

        Some(duration_secs)
    }

    /// Post a takeover notice to the call's thread. The transfer itself is
    /// performed by the telephony platform, not here.
    pub async fn takeover_requested(&self, call_id: &str, requester: &str) -> TakeoverOutcome {
        let key = {
            self.sessions
                .lock()
                .unwrap()
                .get(call_id)
                .map(|s| s.thread_key.clone())
        };

        match key {
            Some(key) => {
                tracing::info!(call_id = %call_id, requester = %requester, "takeover requested");
                self.notify(
                    &key,
                    &AlertPayload::TakeoverRequested {
                        requester: requester.to_string(),
                    },
                )
                .await;
                TakeoverOutcome::Requested
            }
            None => {
                tracing::warn!(call_id = %call_id, "takeover requested for a call that is not active");
                TakeoverOutcome::NotActive
            }
        }
    }

    /// Consistent snapshot of every active session, oldest call first.
    pub fn active_calls(&self) -> Vec<CallSession> {
        let sessions = self.sessions.lock().unwrap();
        let mut calls: Vec<CallSession> = sessions.values().cloned().collect();
        calls.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        calls
    }

    /// Alert delivery is best-effort; a chat outage never fails the call
    /// event that triggered it.
    async fn notify(&self, thread_key: &str, payload: &AlertPayload) {
        if let Err(e) = self.notifier.send_alert(thread_key, payload).await {
            tracing::error!(error = %e, thread_key = %thread_key, "failed to deliver chat alert");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct RecordingNotifier {
        alerts: Mutex<Vec<(String, String)>>,
    }

    impl RecordingNotifier {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                alerts: Mutex::new(vec![]),
            })
        }

        fn events(&self) -> Vec<(String, String)> {
            self.alerts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send_alert(
            &self,
            thread_key: &str,
            payload: &AlertPayload,
        ) -> anyhow::Result<()> {
            let kind = match payload {
                AlertPayload::CallStarted { .. } => "started",
                AlertPayload::Transcript { .. } => "transcript",
                AlertPayload::CallEnded { .. } => "ended",
                AlertPayload::TakeoverRequested { .. } => "takeover",
            };
            self.alerts
                .lock()
                .unwrap()
                .push((thread_key.to_string(), kind.to_string()));
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn send_alert(&self, _: &str, _: &AlertPayload) -> anyhow::Result<()> {
            anyhow::bail!("chat webhook down")
        }
    }

    fn snapshot() -> CustomerSnapshot {
        CustomerSnapshot {
            name: Some("Sarah Johnson".to_string()),
            phone: Some("+18182121359".to_string()),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_full_lifecycle_removes_session() {
        let notifier = RecordingNotifier::new();
        let tracker = SessionTracker::new(notifier.clone());

        let key = tracker
            .call_started("call_1", snapshot(), "Travel Concierge".to_string())
            .await;
        assert_eq!(key, "call-call_1");
        assert_eq!(tracker.active_calls().len(), 1);

        let delivered = tracker
            .transcript(
                "call_1",
                Speaker::Customer,
                "Hi, checking my deposit".to_string(),
                "2025-03-01T10:00:00Z".to_string(),
            )
            .await;
        assert!(delivered);
        assert_eq!(tracker.active_calls()[0].transcript_count, 1);

        let duration = tracker.call_ended("call_1", "completed".to_string()).await;
        assert!(duration.is_some());
        assert!(tracker.active_calls().is_empty());

        let kinds: Vec<String> = notifier.events().iter().map(|(_, k)| k.clone()).collect();
        assert_eq!(kinds, ["started", "transcript", "ended"]);
        assert!(notifier.events().iter().all(|(t, _)| t == "call-call_1"));
    }

    #[tokio::test]
    async fn test_transcript_for_unknown_call_is_a_noop() {
        let notifier = RecordingNotifier::new();
        let tracker = SessionTracker::new(notifier.clone());

        let delivered = tracker
            .transcript(
                "ghost",
                Speaker::Agent,
                "hello?".to_string(),
                String::new(),
            )
            .await;

        assert!(!delivered);
        assert!(tracker.active_calls().is_empty());
        assert!(notifier.events().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_start_keeps_original_session() {
        let notifier = RecordingNotifier::new();
        let tracker = SessionTracker::new(notifier.clone());

        tracker
            .call_started("call_1", snapshot(), "Travel Concierge".to_string())
            .await;
        let started_at = tracker.active_calls()[0].started_at;

        tracker
            .call_started("call_1", CustomerSnapshot::default(), "Other".to_string())
            .await;

        let calls = tracker.active_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].started_at, started_at);
        assert_eq!(calls[0].customer.name.as_deref(), Some("Sarah Johnson"));
        // Only the first start produced an alert.
        assert_eq!(notifier.events().len(), 1);
    }

    #[tokio::test]
    async fn test_end_unknown_call_is_a_noop() {
        let tracker = SessionTracker::new(RecordingNotifier::new());
        assert_eq!(tracker.call_ended("ghost", "completed".to_string()).await, None);
    }

    #[tokio::test]
    async fn test_takeover_outcomes() {
        let notifier = RecordingNotifier::new();
        let tracker = SessionTracker::new(notifier.clone());

        assert_eq!(
            tracker.takeover_requested("ghost", "Dana").await,
            TakeoverOutcome::NotActive
        );

        tracker
            .call_started("call_1", snapshot(), "Travel Concierge".to_string())
            .await;
        assert_eq!(
            tracker.takeover_requested("call_1", "Dana").await,
            TakeoverOutcome::Requested
        );
        assert_eq!(notifier.events().last().unwrap().1, "takeover");
        // The session stays active — the transfer happens elsewhere.
        assert_eq!(tracker.active_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_notifier_failure_does_not_break_tracking() {
        let tracker = SessionTracker::new(Arc::new(FailingNotifier));

        tracker
            .call_started("call_1", snapshot(), "Travel Concierge".to_string())
            .await;
        assert_eq!(tracker.active_calls().len(), 1);

        assert!(tracker.call_ended("call_1", "voicemail".to_string()).await.is_some());
        assert!(tracker.active_calls().is_empty());
    }
}
