use crate::models::fields::is_blank;
use crate::models::{BookingCheck, BookingState};

/// A customer counts as booked when either the flight or the hotel
/// reference is on file. Side-effect-free.
pub fn evaluate(flight_ref: &str, hotel_ref: &str) -> BookingCheck {
    let flight = (!is_blank(flight_ref)).then(|| flight_ref.trim().to_string());
    let hotel = (!is_blank(hotel_ref)).then(|| hotel_ref.trim().to_string());

    let state = if flight.is_some() || hotel.is_some() {
        BookingState::Booked
    } else {
        BookingState::NotBooked
    };

    BookingCheck {
        state,
        flight_ref: flight,
        hotel_ref: hotel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_booked_when_both_blank() {
        let result = evaluate("", "");
        assert_eq!(result.state, BookingState::NotBooked);
        assert_eq!(result.flight_ref, None);
        assert_eq!(result.hotel_ref, None);
    }

    #[test]
    fn test_either_reference_counts() {
        assert_eq!(evaluate("FLIGHT123", "").state, BookingState::Booked);
        assert_eq!(evaluate("", "HOTEL456").state, BookingState::Booked);
    }

    #[test]
    fn test_both_references_kept() {
        let result = evaluate("FLIGHT123", "HOTEL456");
        assert_eq!(result.state, BookingState::Booked);
        assert_eq!(result.flight_ref.as_deref(), Some("FLIGHT123"));
        assert_eq!(result.hotel_ref.as_deref(), Some("HOTEL456"));
    }
}
