use axum::{Json, body::Bytes, extract::State};
use serde::Serialize;

use crate::error::AcademyError;
use crate::state::AppState;
use crate::usecase::purchase::{IngestPaymentEventUseCase, RecordCheckoutUseCase};

#[derive(Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

/// `POST /webhooks/stripe`
///
/// Acknowledges every event it could parse, including duplicates, unknown
/// types and checkouts without an email. Only infrastructure failures return
/// 5xx so the processor redelivers.
pub async fn payment_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<WebhookAck>, AcademyError> {
    let usecase = IngestPaymentEventUseCase {
        recorder: RecordCheckoutUseCase {
            purchases: state.purchase_repo(),
            auth_codes: state.auth_code_repo(),
            notifier: state.notifier(),
            defaults: state.defaults.clone(),
        },
    };
    usecase.execute(&body).await?;
    Ok(Json(WebhookAck { received: true }))
}
