//! Payment-processor webhook events.
//!
//! Only the fields needed to record a purchase are captured; everything else
//! in the processor's payload is ignored.

use serde::Deserialize;

use crate::domain::types::normalize_email;

pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// Webhook envelope: `{ "type": ..., "data": { "object": ... } }`.
///
/// Every field is optional. Any JSON document is an event as far as the
/// webhook is concerned; one without a usable `type` is simply not acted on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub event_type: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// `data.object` of a `checkout.session.completed` event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub metadata: Option<CheckoutMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutMetadata {
    #[serde(default)]
    pub course_slug: Option<String>,
}

/// Processor-agnostic view of a completed checkout.
/// Absent fields are filled from `CourseDefaults` by the recorder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedCheckout {
    pub external_session_id: String,
    pub email: Option<String>,
    pub course_slug: Option<String>,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub customer_id: Option<String>,
}

impl PaymentEvent {
    /// Fails only when the payload is not JSON at all. A JSON document that
    /// does not fit the envelope (e.g. a non-string `type`) parses as an
    /// event without a type.
    pub fn parse(payload: &[u8]) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_slice(payload)?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    pub fn event_type(&self) -> &str {
        self.event_type.as_deref().unwrap_or_default()
    }

    pub fn is_checkout_completed(&self) -> bool {
        self.event_type() == CHECKOUT_SESSION_COMPLETED
    }

    /// `data.object` as a checkout session. A missing `data` or `object`
    /// is an error, same as an object of the wrong shape.
    pub fn checkout_session(&self) -> Result<CheckoutSessionObject, serde_json::Error> {
        let object = self
            .data
            .as_ref()
            .and_then(|d| d.get("object"))
            .cloned()
            .unwrap_or_default();
        serde_json::from_value(object)
    }
}

impl From<CheckoutSessionObject> for CompletedCheckout {
    fn from(session: CheckoutSessionObject) -> Self {
        // customer_details.email is what the buyer typed at checkout; customer_email
        // is only the prefill, so it is the fallback.
        let email = session
            .customer_details
            .and_then(|d| d.email)
            .and_then(|e| normalize_email(&e))
            .or_else(|| session.customer_email.and_then(|e| normalize_email(&e)));

        Self {
            external_session_id: session.id,
            email,
            course_slug: session
                .metadata
                .and_then(|m| m.course_slug)
                .filter(|s| !s.trim().is_empty()),
            amount: session.amount_total,
            currency: session.currency.filter(|c| !c.trim().is_empty()),
            customer_id: session.customer,
        }
    }
}
