use chrono::{Duration, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::payment_event::{CompletedCheckout, PaymentEvent};
use crate::domain::repository::{AuthCodeRepository, Notifier, PurchaseRepository};
use crate::domain::types::{
    CourseDefaults, InsertOutcome, Purchase, PurchaseStatus, WELCOME_CODE_TTL_SECS,
};
use crate::error::AcademyError;
use crate::usecase::authcode::issue_code;
use crate::usecase::notification::{dispatch, welcome_email};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Neither `customer_details.email` nor `customer_email` was usable.
    /// Cannot be completed without manual intervention, so it is not retried.
    MissingEmail,
    /// `data.object` lacks the checkout session id or has the wrong shape.
    MalformedCheckout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    AlreadyRecorded,
    Rejected(RejectReason),
}

// ── RecordCheckout ───────────────────────────────────────────────────────────

pub struct RecordCheckoutUseCase<P, A, N>
where
    P: PurchaseRepository,
    A: AuthCodeRepository,
    N: Notifier + Clone + 'static,
{
    pub purchases: P,
    pub auth_codes: A,
    pub notifier: N,
    pub defaults: CourseDefaults,
}

impl<P, A, N> RecordCheckoutUseCase<P, A, N>
where
    P: PurchaseRepository,
    A: AuthCodeRepository,
    N: Notifier + Clone + 'static,
{
    pub async fn execute(&self, checkout: CompletedCheckout) -> Result<RecordOutcome, AcademyError> {
        let session_id = checkout.external_session_id.as_str();
        if session_id.trim().is_empty() {
            error!("checkout session without id");
            return Ok(RecordOutcome::Rejected(RejectReason::MalformedCheckout));
        }

        // 1. No email → nobody to grant access to.
        let Some(email) = checkout.email.clone() else {
            error!(external_session_id = %session_id, "no email in checkout session");
            return Ok(RecordOutcome::Rejected(RejectReason::MissingEmail));
        };

        // 2. Redelivery of an already recorded checkout.
        if self
            .purchases
            .find_by_external_session_id(session_id)
            .await?
            .is_some()
        {
            info!(external_session_id = %session_id, "purchase already recorded");
            return Ok(RecordOutcome::AlreadyRecorded);
        }

        // 3. Insert; the unique index catches a redelivery racing past step 2.
        let purchase = Purchase {
            id: Uuid::new_v4(),
            email: email.clone(),
            external_session_id: checkout.external_session_id.clone(),
            external_customer_id: checkout.customer_id.clone(),
            amount: checkout.amount.unwrap_or(self.defaults.amount),
            currency: checkout
                .currency
                .clone()
                .unwrap_or_else(|| self.defaults.currency.clone())
                .to_lowercase(),
            course_slug: checkout
                .course_slug
                .clone()
                .unwrap_or_else(|| self.defaults.course_slug.clone()),
            status: PurchaseStatus::Completed,
            created_at: Utc::now(),
        };

        if self.purchases.insert(&purchase).await? == InsertOutcome::Duplicate {
            info!(external_session_id = %session_id, "purchase recorded concurrently");
            return Ok(RecordOutcome::AlreadyRecorded);
        }
        info!(
            purchase_id = %purchase.id,
            course_slug = %purchase.course_slug,
            "purchase recorded"
        );

        // 4. Long-lived code so the buyer can sign in straight from the welcome mail.
        // The purchase already stands; a failure here must not turn into a retry
        // that would hit AlreadyRecorded and never send the mail.
        match issue_code(
            &self.auth_codes,
            &email,
            Duration::seconds(WELCOME_CODE_TTL_SECS),
        )
        .await
        {
            Ok(code) => dispatch(
                &self.notifier,
                welcome_email(
                    &email,
                    &code.code,
                    &self.defaults.course_title,
                    &self.defaults.app_url,
                ),
                "welcome",
            ),
            Err(e) => warn!(
                purchase_id = %purchase.id,
                error = %e,
                "failed to issue welcome code"
            ),
        }

        Ok(RecordOutcome::Recorded)
    }
}

// ── IngestPaymentEvent ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Checkout(RecordOutcome),
    /// Event type this service does not act on. Still acknowledged, otherwise
    /// the processor keeps retrying it.
    Ignored { event_type: String },
}

pub struct IngestPaymentEventUseCase<P, A, N>
where
    P: PurchaseRepository,
    A: AuthCodeRepository,
    N: Notifier + Clone + 'static,
{
    pub recorder: RecordCheckoutUseCase<P, A, N>,
}

impl<P, A, N> IngestPaymentEventUseCase<P, A, N>
where
    P: PurchaseRepository,
    A: AuthCodeRepository,
    N: Notifier + Clone + 'static,
{
    pub async fn execute(&self, payload: &[u8]) -> Result<IngestOutcome, AcademyError> {
        let event = PaymentEvent::parse(payload).map_err(|e| {
            warn!(error = %e, "unparseable payment event");
            AcademyError::InvalidPayload
        })?;

        if !event.is_checkout_completed() {
            info!(event_type = %event.event_type(), "unhandled payment event type");
            return Ok(IngestOutcome::Ignored {
                event_type: event.event_type().to_owned(),
            });
        }

        let session = match event.checkout_session() {
            Ok(session) => session,
            Err(e) => {
                error!(event_id = ?event.id, error = %e, "malformed checkout session object");
                return Ok(IngestOutcome::Checkout(RecordOutcome::Rejected(
                    RejectReason::MalformedCheckout,
                )));
            }
        };

        let outcome = self.recorder.execute(CompletedCheckout::from(session)).await?;
        Ok(IngestOutcome::Checkout(outcome))
    }
}
