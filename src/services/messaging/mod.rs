pub mod twilio;

use async_trait::async_trait;

#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Send an SMS; returns the provider's message id on success.
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<String>;
}

/// E.164 for outbound SMS: ten-digit national numbers get the +1 prefix,
/// eleven digits with a leading 1 get the plus, anything else passes
/// through as given.
pub fn format_e164(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 {
        format!("+1{digits}")
    } else if digits.len() == 11 && digits.starts_with('1') {
        format!("+{digits}")
    } else {
        phone.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_digit_gets_country_code() {
        assert_eq!(format_e164("4155551234"), "+14155551234");
        assert_eq!(format_e164("(415) 555-1234"), "+14155551234");
    }

    #[test]
    fn test_eleven_digit_gets_plus() {
        assert_eq!(format_e164("14155551234"), "+14155551234");
    }

    #[test]
    fn test_other_formats_pass_through() {
        assert_eq!(format_e164("+447700900123"), "+447700900123");
    }
}
