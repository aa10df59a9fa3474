pub mod caspio;
pub mod mock;

use async_trait::async_trait;

use crate::models::{CustomerRecord, LeadRecord, LeadUpdate, Memo, NewMemo};

/// Narrow surface over the backing record store. Production talks to a
/// hosted table API; tests and dev mode use the in-memory implementation.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_by_phone(&self, digits: &str) -> anyhow::Result<Option<CustomerRecord>>;
    async fn find_by_certificate(&self, code: &str) -> anyhow::Result<Option<CustomerRecord>>;
    async fn create_memo(&self, memo: &NewMemo) -> anyhow::Result<String>;
    async fn memos_for_customer(&self, customer_id: &str) -> anyhow::Result<Vec<Memo>>;
    async fn create_lead(&self, lead: &LeadRecord) -> anyhow::Result<()>;
    async fn update_lead(&self, lead_id: &str, update: &LeadUpdate) -> anyhow::Result<()>;
}

/// Strip formatting from a phone number; 11-digit numbers with a leading
/// country '1' collapse to the 10-digit national form. Applied to query
/// input and stored values alike so the two sides stay comparable.
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 11 && digits.starts_with('1') {
        digits[1..].to_string()
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_formatting() {
        assert_eq!(normalize_phone("(818) 212-1359"), "8182121359");
        assert_eq!(normalize_phone("818.212.1359"), "8182121359");
    }

    #[test]
    fn test_normalize_drops_leading_country_one() {
        assert_eq!(normalize_phone("+18182121359"), "8182121359");
        assert_eq!(normalize_phone("18182121359"), "8182121359");
    }

    #[test]
    fn test_normalize_keeps_other_lengths() {
        // 11 digits not starting with 1, and short numbers, pass through.
        assert_eq!(normalize_phone("28182121359"), "28182121359");
        assert_eq!(normalize_phone("121359"), "121359");
        assert_eq!(normalize_phone(""), "");
    }
}
