use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub use_mock_store: bool,
    pub caspio_account_id: String,
    pub caspio_base_url: String,
    pub caspio_token_url: String,
    pub caspio_client_id: String,
    pub caspio_client_secret: String,
    pub customers_table: String,
    pub memos_table: String,
    pub leads_table: String,
    pub chat_webhook_url: String,
    pub call_webhook_secret: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: String,
    pub payment_page_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let account_id = env::var("CASPIO_ACCOUNT_ID").unwrap_or_default();
        let base_url = env::var("CASPIO_BASE_URL")
            .unwrap_or_else(|_| format!("https://{account_id}.caspio.com"));
        let token_url =
            env::var("CASPIO_TOKEN_URL").unwrap_or_else(|_| format!("{base_url}/oauth/token"));

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            use_mock_store: env::var("USE_MOCK_DATA")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            caspio_account_id: account_id,
            caspio_base_url: base_url,
            caspio_token_url: token_url,
            caspio_client_id: env::var("CASPIO_CLIENT_ID").unwrap_or_default(),
            caspio_client_secret: env::var("CASPIO_CLIENT_SECRET").unwrap_or_default(),
            customers_table: env::var("CASPIO_TABLE_CUSTOMERS")
                .unwrap_or_else(|_| "RIMS_DATA".to_string()),
            memos_table: env::var("CASPIO_TABLE_MEMOS")
                .unwrap_or_else(|_| "RIMS_MEMOS".to_string()),
            leads_table: env::var("CASPIO_TABLE_LEADS")
                .unwrap_or_else(|_| "TravelBucks_Leads".to_string()),
            chat_webhook_url: env::var("GOOGLE_CHAT_WEBHOOK_URL").unwrap_or_default(),
            call_webhook_secret: env::var("CALL_WEBHOOK_SECRET").unwrap_or_default(),
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            twilio_phone_number: env::var("TWILIO_PHONE_NUMBER").unwrap_or_default(),
            payment_page_url: env::var("CASPIO_PAYMENT_URL").unwrap_or_default(),
        }
    }
}
