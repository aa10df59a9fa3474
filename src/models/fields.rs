use chrono::NaiveDate;
use serde_json::Value;

/// Single predicate for every "not set" spelling the source data uses:
/// empty strings and the zero-date sentinel both count as blank.
pub fn is_blank(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == "0000-00-00"
}

/// Calendar date from a `YYYY-MM-DD` field. Blank sentinels and unparseable
/// values both come back as None — date fields never fail a request.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if is_blank(value) {
        return None;
    }
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Money amount from a raw row value. The table API returns numbers for some
/// rows and strings for others; anything absent or non-numeric coerces to 0.
pub fn money_value(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// String field from a raw row value, with null and non-string collapsing
/// to the empty string.
pub fn string_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_sentinels_are_equivalent() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("0000-00-00"));
        assert!(!is_blank("2025-06-15"));
        assert!(!is_blank("John Smith"));
    }

    #[test]
    fn test_parse_date_treats_all_blanks_as_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("0000-00-00"), None);
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(
            parse_date("2025-06-15"),
            NaiveDate::from_ymd_opt(2025, 6, 15)
        );
    }

    #[test]
    fn test_money_coerces_bad_input_to_zero() {
        assert_eq!(money_value(Some(&serde_json::json!(250.5))), 250.5);
        assert_eq!(money_value(Some(&serde_json::json!("750"))), 750.0);
        assert_eq!(money_value(Some(&serde_json::json!("n/a"))), 0.0);
        assert_eq!(money_value(Some(&serde_json::json!(null))), 0.0);
        assert_eq!(money_value(None), 0.0);
    }

    #[test]
    fn test_string_value_trims_and_defaults() {
        assert_eq!(string_value(Some(&serde_json::json!("  BEACH "))), "BEACH");
        assert_eq!(string_value(Some(&serde_json::json!(123456))), "123456");
        assert_eq!(string_value(Some(&serde_json::json!(null))), "");
        assert_eq!(string_value(None), "");
    }
}
