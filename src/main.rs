use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use rims_gateway::config::AppConfig;
use rims_gateway::handlers;
use rims_gateway::services::calls::SessionTracker;
use rims_gateway::services::knowledge_base::KnowledgeBase;
use rims_gateway::services::messaging::twilio::TwilioSmsProvider;
use rims_gateway::services::notify::google_chat::GoogleChatNotifier;
use rims_gateway::services::notify::Notifier;
use rims_gateway::services::store::caspio::CaspioStore;
use rims_gateway::services::store::mock::MockStore;
use rims_gateway::services::store::RecordStore;
use rims_gateway::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let store: Box<dyn RecordStore> = if config.use_mock_store {
        let mock = MockStore::seeded();
        tracing::info!(customers = mock.customer_count(), "using seeded in-memory store (mock mode)");
        Box::new(mock)
    } else {
        anyhow::ensure!(
            !config.caspio_client_id.is_empty() && !config.caspio_client_secret.is_empty(),
            "CASPIO_CLIENT_ID and CASPIO_CLIENT_SECRET must be set unless USE_MOCK_DATA=true"
        );
        tracing::info!(account = %config.caspio_account_id, "using Caspio table store");
        Box::new(CaspioStore::new(&config))
    };

    if config.chat_webhook_url.is_empty() {
        tracing::warn!("GOOGLE_CHAT_WEBHOOK_URL not set, call alerts will be dropped");
    }
    let notifier: Arc<dyn Notifier> = Arc::new(GoogleChatNotifier::new(
        config.chat_webhook_url.clone(),
    ));

    let messaging = TwilioSmsProvider::new(
        config.twilio_account_sid.clone(),
        config.twilio_auth_token.clone(),
        config.twilio_phone_number.clone(),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        kb: KnowledgeBase::builtin(),
        sessions: SessionTracker::new(notifier),
        messaging: Box::new(messaging),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/customers/phone-lookup",
            post(handlers::customers::phone_lookup),
        )
        .route(
            "/api/customers/certificate-lookup",
            post(handlers::customers::certificate_lookup),
        )
        .route(
            "/api/customers/status",
            get(handlers::customers::customer_status),
        )
        .route("/api/kb/package/:code", get(handlers::kb::package_lookup))
        .route(
            "/api/logic/deposits-check",
            post(handlers::logic::deposits_check),
        )
        .route(
            "/api/logic/travel-rep-check",
            post(handlers::logic::travel_rep_check),
        )
        .route(
            "/api/logic/booking-check",
            post(handlers::logic::booking_check),
        )
        .route("/api/memos", post(handlers::memos::create_memo))
        .route("/api/memos/:customer_id", get(handlers::memos::list_memos))
        .route(
            "/webhook/calls/started",
            post(handlers::calls::call_started),
        )
        .route(
            "/webhook/calls/transcript",
            post(handlers::calls::transcript_update),
        )
        .route("/webhook/calls/ended", post(handlers::calls::call_ended))
        .route(
            "/webhook/chat/interaction",
            post(handlers::calls::chat_interaction),
        )
        .route("/api/calls/active", get(handlers::calls::active_calls))
        .route("/webhooks/leads/google", post(handlers::leads::google_lead))
        .route(
            "/webhooks/leads/landing-page",
            post(handlers::leads::landing_page_lead),
        )
        .route(
            "/webhooks/send-payment-sms",
            post(handlers::payments::send_payment_sms),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
