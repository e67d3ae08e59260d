use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use academy_core::health::{healthz, readyz};
use academy_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    access::check_access,
    auth::{get_session, logout, send_code, verify_code},
    progress::{get_progress, put_progress},
    webhook::payment_webhook,
};
use crate::state::AppState;

pub const SERVICE_NAME: &str = "academy";

async fn index() -> Json<Value> {
    Json(json!({ "status": "ok", "service": SERVICE_NAME }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Login codes + sessions
        .route("/auth/send-code", post(send_code))
        .route("/auth/verify-code", post(verify_code))
        .route("/auth/session", get(get_session))
        .route("/auth/logout", post(logout))
        // Payment processor
        .route("/webhooks/stripe", post(payment_webhook))
        // Course gate
        .route("/api/access", get(check_access))
        .route("/api/progress", get(get_progress).put(put_progress))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
