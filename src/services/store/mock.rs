use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use super::{normalize_phone, RecordStore};
use crate::models::{CustomerRecord, LeadRecord, LeadUpdate, Memo, NewMemo};

/// In-memory store used in dev mode (USE_MOCK_DATA) and in tests. Memos and
/// leads are held behind shared handles so tests can inspect what was
/// written.
pub struct MockStore {
    customers: Vec<CustomerRecord>,
    memos: Arc<Mutex<Vec<Memo>>>,
    leads: Arc<Mutex<Vec<LeadRecord>>>,
}

impl MockStore {
    pub fn with_customers(customers: Vec<CustomerRecord>) -> Self {
        Self {
            customers,
            memos: Arc::new(Mutex::new(vec![])),
            leads: Arc::new(Mutex::new(vec![])),
        }
    }

    /// The sample customers the service ships with for local testing: one
    /// fully booked, one deposits-complete, one with nothing paid.
    pub fn seeded() -> Self {
        let rows = [
            serde_json::json!({
                "phn1": "8182121359",
                "phn2": "3105551234",
                "pkg_code": "BEACH",
                "pkg_code2": "BEACH123",
                "vac_id": "123456",
                "last_name": "Johnson",
                "first_name": "Sarah",
                "email": "sarah.johnson@email.com",
                "val_dep": 250.0,
                "conf_deposit": 500.0,
                "Asgn_trv_DT": "2025-06-15",
                "confirm_status": "confirm",
                "tm": "John Smith",
                "date_print_enc": "2025-05-01",
                "agency_book_via": "FLIGHT123",
                "htl_bk_via": "HOTEL456",
            }),
            serde_json::json!({
                "phn1": "3105559876",
                "pkg_code": "E",
                "pkg_code2": "E789",
                "vac_id": "234567",
                "last_name": "Chen",
                "first_name": "Mike",
                "email": "mike.chen@email.com",
                "val_dep": 250.0,
                "conf_deposit": 250.0,
                "Asgn_trv_DT": "2025-01-26",
                "confirm_status": "confirm",
            }),
            serde_json::json!({
                "phn1": "4155551212",
                "pkg_code": "SKI",
                "pkg_code2": "SKI555",
                "vac_id": "345678",
                "last_name": "Martinez",
                "first_name": "Lisa",
                "email": "lisa.martinez@email.com",
                "val_dep": 0,
                "conf_deposit": 0,
                "Asgn_trv_DT": "2025-08-15",
                "confirm_status": "confirm",
            }),
        ];

        Self::with_customers(rows.iter().map(CustomerRecord::from_row).collect())
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    pub fn memos_handle(&self) -> Arc<Mutex<Vec<Memo>>> {
        Arc::clone(&self.memos)
    }

    pub fn leads_handle(&self) -> Arc<Mutex<Vec<LeadRecord>>> {
        Arc::clone(&self.leads)
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn find_by_phone(&self, digits: &str) -> anyhow::Result<Option<CustomerRecord>> {
        let digits = normalize_phone(digits);
        Ok(self
            .customers
            .iter()
            .find(|c| {
                normalize_phone(&c.primary_phone) == digits
                    || normalize_phone(&c.secondary_phone) == digits
            })
            .cloned())
    }

    async fn find_by_certificate(&self, code: &str) -> anyhow::Result<Option<CustomerRecord>> {
        let code = code.trim();
        Ok(self
            .customers
            .iter()
            .find(|c| c.certificate_number.eq_ignore_ascii_case(code))
            .cloned())
    }

    async fn create_memo(&self, memo: &NewMemo) -> anyhow::Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.memos.lock().unwrap().push(Memo {
            id: id.clone(),
            memo_type: memo.memo_type.clone(),
            details: memo.details.clone(),
            customer_id: memo.customer_id.clone(),
            phone_number: memo.phone_number.clone().unwrap_or_default(),
            created_date: Utc::now().date_naive(),
            created_by: "AI Agent".to_string(),
        });
        Ok(id)
    }

    async fn memos_for_customer(&self, customer_id: &str) -> anyhow::Result<Vec<Memo>> {
        Ok(self
            .memos
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn create_lead(&self, lead: &LeadRecord) -> anyhow::Result<()> {
        self.leads.lock().unwrap().push(lead.clone());
        Ok(())
    }

    async fn update_lead(&self, lead_id: &str, update: &LeadUpdate) -> anyhow::Result<()> {
        let mut leads = self.leads.lock().unwrap();
        let Some(lead) = leads.iter_mut().find(|l| l.lead_id == lead_id) else {
            anyhow::bail!("lead {lead_id} not found");
        };
        if let Some(status) = &update.status {
            lead.status = status.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_phone_lookup_matches_either_number() {
        let store = MockStore::seeded();
        let by_primary = store.find_by_phone("+1 (818) 212-1359").await.unwrap();
        assert_eq!(by_primary.unwrap().customer_id, "123456");

        let by_secondary = store.find_by_phone("3105551234").await.unwrap();
        assert_eq!(by_secondary.unwrap().customer_id, "123456");
    }

    #[tokio::test]
    async fn test_certificate_lookup_ignores_case() {
        let store = MockStore::seeded();
        let found = store.find_by_certificate("e789").await.unwrap();
        assert_eq!(found.unwrap().customer_id, "234567");
    }

    #[tokio::test]
    async fn test_unknown_phone_is_none_not_error() {
        let store = MockStore::seeded();
        assert!(store.find_by_phone("5550000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memo_roundtrip() {
        let store = MockStore::seeded();
        let id = store
            .create_memo(&NewMemo {
                memo_type: "ask tr to call".to_string(),
                details: "Travel Rep: John Smith, Customer: 8182121359".to_string(),
                customer_id: "123456".to_string(),
                phone_number: None,
            })
            .await
            .unwrap();

        let memos = store.memos_for_customer("123456").await.unwrap();
        assert_eq!(memos.len(), 1);
        assert_eq!(memos[0].id, id);
        assert!(store.memos_for_customer("999999").await.unwrap().is_empty());
    }
}
