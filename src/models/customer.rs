use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{is_blank, money_value, parse_date, string_value};

/// One travel customer's policy-relevant facts, normalized from whatever
/// shape the backing table returned them in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub primary_phone: String,
    pub secondary_phone: String,
    pub package_code: String,
    pub certificate_number: String,
    pub validation_deposit: f64,
    pub confirmation_deposit: f64,
    pub travel_date: Option<NaiveDate>,
    pub confirm_status: String,
    pub travel_rep: String,
    pub docs_sent_date: Option<NaiveDate>,
    pub flight_booking: String,
    pub hotel_booking: String,
}

impl CustomerRecord {
    /// The single normalization point for rows off the hosted table API.
    /// Different data paths expose the same column under different casings,
    /// so field names are matched leniently here and nowhere else.
    pub fn from_row(row: &Value) -> Self {
        Self {
            customer_id: pick_string(row, &["vac_id", "VAC_ID", "customer_id"]),
            first_name: pick_string(row, &["first_name", "First_Name"]),
            last_name: pick_string(row, &["last_name", "Last_Name"]),
            email: pick_string(row, &["email", "Email"]),
            primary_phone: pick_string(row, &["phn1", "PHN1", "phone"]),
            secondary_phone: pick_string(row, &["phn2", "PHN2"]),
            package_code: pick_string(row, &["pkg_code", "PKG_CODE"]),
            certificate_number: pick_string(row, &["pkg_code2", "PKG_CODE2", "certificate"]),
            validation_deposit: pick_money(row, &["val_dep", "VAL_DEP"]),
            confirmation_deposit: pick_money(row, &["conf_deposit", "CONF_DEPOSIT"]),
            travel_date: pick_date(row, &["Asgn_trv_DT", "asgn_trv_dt"]),
            confirm_status: pick_string(row, &["confirm_status", "CONFIRM_STATUS"]),
            travel_rep: pick_string(row, &["tm", "TM"]),
            docs_sent_date: pick_date(row, &["date_print_enc", "DATE_PRINT_ENC"]),
            flight_booking: pick_string(row, &["agency_book_via", "AGENCY_BOOK_VIA"]),
            hotel_booking: pick_string(row, &["htl_bk_via", "HTL_BK_VIA"]),
        }
    }

    pub fn full_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim().to_string();
        if full.is_empty() {
            "Unknown Customer".to_string()
        } else {
            full
        }
    }

    /// Code used against the knowledge base: package code first, certificate
    /// number as the fallback. This precedence is fixed — callers must not
    /// pick per-field.
    pub fn resolution_code(&self) -> &str {
        if is_blank(&self.package_code) {
            &self.certificate_number
        } else {
            &self.package_code
        }
    }
}

fn pick<'a>(row: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| {
        row.get(*k).filter(|v| {
            if v.is_null() {
                return false;
            }
            match v.as_str() {
                Some(s) => !s.trim().is_empty(),
                None => true,
            }
        })
    })
}

fn pick_string(row: &Value, keys: &[&str]) -> String {
    string_value(pick(row, keys))
}

fn pick_money(row: &Value, keys: &[&str]) -> f64 {
    money_value(pick(row, keys))
}

fn pick_date(row: &Value, keys: &[&str]) -> Option<NaiveDate> {
    parse_date(&string_value(pick(row, keys)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_row_normalizes_lowercase_fields() {
        let row = serde_json::json!({
            "phn1": "8182121359",
            "pkg_code": "BEACH",
            "pkg_code2": "BEACH123",
            "vac_id": "123456",
            "first_name": "Sarah",
            "last_name": "Johnson",
            "val_dep": 250.0,
            "conf_deposit": "500",
            "Asgn_trv_DT": "2025-06-15",
            "confirm_status": "confirm",
            "tm": "John Smith",
        });

        let record = CustomerRecord::from_row(&row);
        assert_eq!(record.customer_id, "123456");
        assert_eq!(record.primary_phone, "8182121359");
        assert_eq!(record.validation_deposit, 250.0);
        assert_eq!(record.confirmation_deposit, 500.0);
        assert_eq!(
            record.travel_date,
            NaiveDate::from_ymd_opt(2025, 6, 15)
        );
        assert_eq!(record.travel_rep, "John Smith");
    }

    #[test]
    fn test_from_row_accepts_uppercase_variants() {
        let row = serde_json::json!({
            "VAC_ID": "234567",
            "PKG_CODE2": "E789",
            "VAL_DEP": 250,
            "CONF_DEPOSIT": 250,
        });

        let record = CustomerRecord::from_row(&row);
        assert_eq!(record.customer_id, "234567");
        assert_eq!(record.certificate_number, "E789");
        assert_eq!(record.validation_deposit, 250.0);
    }

    #[test]
    fn test_from_row_blank_dates_are_none() {
        let row = serde_json::json!({
            "vac_id": "345678",
            "Asgn_trv_DT": "0000-00-00",
            "date_print_enc": "",
        });

        let record = CustomerRecord::from_row(&row);
        assert_eq!(record.travel_date, None);
        assert_eq!(record.docs_sent_date, None);
    }

    #[test]
    fn test_resolution_code_prefers_package_code() {
        let row = serde_json::json!({ "pkg_code": "E", "pkg_code2": "E789" });
        assert_eq!(CustomerRecord::from_row(&row).resolution_code(), "E");

        let row = serde_json::json!({ "pkg_code": "", "pkg_code2": "E789" });
        assert_eq!(CustomerRecord::from_row(&row).resolution_code(), "E789");
    }

    #[test]
    fn test_full_name_falls_back_when_empty() {
        let record = CustomerRecord::from_row(&serde_json::json!({}));
        assert_eq!(record.full_name(), "Unknown Customer");
    }
}
