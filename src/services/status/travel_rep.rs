use chrono::NaiveDate;

use crate::models::fields::is_blank;
use crate::models::{TravelRepState, TravelRepStatus};

/// Below this many days out, an unassigned rep is an urgent follow-up.
pub const URGENT_THRESHOLD_DAYS: i64 = 45;
/// Above this many days out, assignment is not expected yet.
pub const EARLY_THRESHOLD_DAYS: i64 = 75;

/// Ordered decision chain over the rep-assignment facts; the first matching
/// branch wins and the branches are mutually exclusive by construction.
/// `today` is the UTC calendar date — day boundaries are UTC midnight.
pub fn evaluate(
    travel_date: Option<NaiveDate>,
    confirm_status: &str,
    rep_name: &str,
    docs_sent_date: Option<NaiveDate>,
    today: NaiveDate,
) -> TravelRepStatus {
    let Some(travel_date) = travel_date else {
        return TravelRepStatus {
            state: TravelRepState::NoDate,
            days_remaining: None,
        };
    };

    let days_remaining = (travel_date - today).num_days();
    let with_days = |state| TravelRepStatus {
        state,
        days_remaining: Some(days_remaining),
    };

    if days_remaining < 0 {
        return with_days(TravelRepState::PastDate);
    }

    if confirm_status.trim() != "confirm" {
        return with_days(TravelRepState::NotConfirmed);
    }

    if is_blank(rep_name) {
        let state = if days_remaining < URGENT_THRESHOLD_DAYS {
            TravelRepState::NeedsUrgent
        } else if days_remaining <= EARLY_THRESHOLD_DAYS {
            TravelRepState::NormalWindow
        } else {
            TravelRepState::TooEarly
        };
        return with_days(state);
    }

    if docs_sent_date.is_none() {
        return with_days(TravelRepState::AssignedNoDocs);
    }

    with_days(TravelRepState::Complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn days_out(days: i64) -> Option<NaiveDate> {
        Some(today() + Duration::days(days))
    }

    #[test]
    fn test_blank_date_wins_over_everything() {
        let result = evaluate(None, "confirm", "John Smith", None, today());
        assert_eq!(result.state, TravelRepState::NoDate);
        assert_eq!(result.days_remaining, None);
    }

    #[test]
    fn test_past_date() {
        let result = evaluate(days_out(-1), "confirm", "", None, today());
        assert_eq!(result.state, TravelRepState::PastDate);
        assert_eq!(result.days_remaining, Some(-1));
    }

    #[test]
    fn test_not_confirmed_is_checked_before_rep() {
        let result = evaluate(days_out(30), "pending", "", None, today());
        assert_eq!(result.state, TravelRepState::NotConfirmed);
    }

    #[test]
    fn test_confirm_must_match_exactly() {
        let result = evaluate(days_out(30), "Confirmed", "", None, today());
        assert_eq!(result.state, TravelRepState::NotConfirmed);
    }

    #[test]
    fn test_window_boundaries() {
        let cases = [
            (44, TravelRepState::NeedsUrgent),
            (45, TravelRepState::NormalWindow),
            (75, TravelRepState::NormalWindow),
            (76, TravelRepState::TooEarly),
        ];
        for (days, expected) in cases {
            let result = evaluate(days_out(days), "confirm", "", None, today());
            assert_eq!(result.state, expected, "at {days} days");
            assert_eq!(result.days_remaining, Some(days));
        }
    }

    #[test]
    fn test_travel_today_is_urgent() {
        let result = evaluate(days_out(0), "confirm", "", None, today());
        assert_eq!(result.state, TravelRepState::NeedsUrgent);
    }

    #[test]
    fn test_rep_assigned_without_docs() {
        let result = evaluate(days_out(30), "confirm", "John Smith", None, today());
        assert_eq!(result.state, TravelRepState::AssignedNoDocs);
    }

    #[test]
    fn test_rep_assigned_with_docs_is_complete() {
        let docs = Some(today() - Duration::days(5));
        let result = evaluate(days_out(30), "confirm", "John Smith", docs, today());
        assert_eq!(result.state, TravelRepState::Complete);
    }

    #[test]
    fn test_blank_rep_spellings_are_equivalent() {
        for rep in ["", "  ", "0000-00-00"] {
            let result = evaluate(days_out(40), "confirm", rep, None, today());
            assert_eq!(result.state, TravelRepState::NeedsUrgent, "rep {rep:?}");
        }
    }
}
