use sea_orm::Database;
use tracing::{info, warn};

use academy::config::AcademyConfig;
use academy::infra::mailer::AppNotifier;
use academy::router::build_router;
use academy::state::AppState;
use academy_core::config::Config;
use academy_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AcademyConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let notifier = AppNotifier::from_config(
        config.resend_api_key.as_deref(),
        &config.email_from,
        config.email_reply_to.clone(),
    );
    if matches!(notifier, AppNotifier::Log(_)) {
        warn!("RESEND_API_KEY not set, outgoing email will only be logged");
    }

    let state = AppState {
        db,
        notifier,
        defaults: config.course_defaults(),
        cookie_domain: config.cookie_domain.clone(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.academy_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("academy service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
