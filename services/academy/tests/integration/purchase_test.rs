use chrono::Duration;
use serde_json::json;

use academy::domain::payment_event::CompletedCheckout;
use academy::domain::types::{PurchaseStatus, WELCOME_CODE_TTL_SECS};
use academy::error::AcademyError;
use academy::usecase::purchase::{
    IngestOutcome, IngestPaymentEventUseCase, RecordCheckoutUseCase, RecordOutcome, RejectReason,
};
use academy::usecase::session::{VerifyCodeInput, VerifyCodeUseCase};

use crate::helpers::*;

struct Fixture {
    purchases: MockPurchaseRepo,
    codes: MockAuthCodeRepo,
    notifier: MockNotifier,
}

impl Fixture {
    fn new() -> Self {
        Self::with_purchases(MockPurchaseRepo::empty())
    }

    fn with_purchases(purchases: MockPurchaseRepo) -> Self {
        Self {
            purchases,
            codes: MockAuthCodeRepo::empty(),
            notifier: MockNotifier::new(),
        }
    }

    fn recorder(&self) -> RecordCheckoutUseCase<MockPurchaseRepo, MockAuthCodeRepo, MockNotifier> {
        RecordCheckoutUseCase {
            purchases: self.purchases.clone(),
            auth_codes: self.codes.clone(),
            notifier: self.notifier.clone(),
            defaults: test_defaults(),
        }
    }

    fn ingest(&self) -> IngestPaymentEventUseCase<MockPurchaseRepo, MockAuthCodeRepo, MockNotifier> {
        IngestPaymentEventUseCase {
            recorder: self.recorder(),
        }
    }
}

fn checkout(session_id: &str, email: Option<&str>) -> CompletedCheckout {
    CompletedCheckout {
        external_session_id: session_id.to_owned(),
        email: email.map(str::to_owned),
        ..Default::default()
    }
}

fn event(event_type: &str, object: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "id": "evt_1",
        "type": event_type,
        "data": { "object": object },
    }))
    .unwrap()
}

// ── RecordCheckout ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_record_purchase_with_defaults() {
    let fx = Fixture::new();

    let outcome = fx.recorder().execute(checkout("sess_1", Some("b@x.com"))).await;
    assert!(
        matches!(outcome, Ok(RecordOutcome::Recorded)),
        "expected Recorded, got {outcome:?}"
    );

    let purchases = fx.purchases.purchases_handle().lock().unwrap().clone();
    assert_eq!(purchases.len(), 1);
    let p = &purchases[0];
    assert_eq!(p.email, "b@x.com");
    assert_eq!(p.external_session_id, "sess_1");
    assert_eq!(p.amount, 9900);
    assert_eq!(p.currency, "eur");
    assert_eq!(p.course_slug, "openclaw-beginner-course");
    assert_eq!(p.status, PurchaseStatus::Completed);
}

#[tokio::test]
async fn should_keep_checkout_fields_over_defaults() {
    let fx = Fixture::new();
    let input = CompletedCheckout {
        external_session_id: "sess_9".to_owned(),
        email: Some("b@x.com".to_owned()),
        course_slug: Some("advanced".to_owned()),
        amount: Some(4900),
        currency: Some("USD".to_owned()),
        customer_id: Some("cus_1".to_owned()),
    };

    fx.recorder().execute(input).await.unwrap();

    let p = fx.purchases.purchases_handle().lock().unwrap()[0].clone();
    assert_eq!(p.course_slug, "advanced");
    assert_eq!(p.amount, 4900);
    assert_eq!(p.currency, "usd");
    assert_eq!(p.external_customer_id.as_deref(), Some("cus_1"));
}

#[tokio::test]
async fn should_issue_welcome_code_and_email() {
    let fx = Fixture::new();

    fx.recorder()
        .execute(checkout("sess_1", Some("b@x.com")))
        .await
        .unwrap();

    let codes = fx.codes.codes_handle().lock().unwrap().clone();
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].email, "b@x.com");
    assert!(!codes[0].used);
    assert_expires_in(codes[0].expires_at, Duration::seconds(WELCOME_CODE_TTL_SECS));

    let sent = wait_for_emails(&fx.notifier.sent_handle(), 1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "b@x.com");
    assert!(sent[0].subject.starts_with("Welcome"));
    assert!(sent[0].html.contains(&codes[0].code));
    assert!(sent[0].html.contains("https://academy.test/login"));
}

#[tokio::test]
async fn should_record_duplicate_delivery_once() {
    let fx = Fixture::new();
    let recorder = fx.recorder();

    let first = recorder.execute(checkout("sess_1", Some("b@x.com"))).await;
    let second = recorder.execute(checkout("sess_1", Some("b@x.com"))).await;

    assert!(matches!(first, Ok(RecordOutcome::Recorded)), "got {first:?}");
    assert!(
        matches!(second, Ok(RecordOutcome::AlreadyRecorded)),
        "expected AlreadyRecorded, got {second:?}"
    );
    assert_eq!(fx.purchases.purchases_handle().lock().unwrap().len(), 1);
    assert_eq!(fx.codes.codes_handle().lock().unwrap().len(), 1);

    settle().await;
    assert_eq!(fx.notifier.sent_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_map_insert_race_to_already_recorded() {
    // Pre-check misses the row a concurrent delivery just wrote; the unique index catches it.
    let existing = test_purchase("b@x.com", "sess_1", "openclaw-beginner-course");
    let fx = Fixture::with_purchases(MockPurchaseRepo::new(vec![existing]).with_blind_reads());

    let outcome = fx.recorder().execute(checkout("sess_1", Some("b@x.com"))).await;
    assert!(
        matches!(outcome, Ok(RecordOutcome::AlreadyRecorded)),
        "expected AlreadyRecorded, got {outcome:?}"
    );
    assert_eq!(fx.purchases.purchases_handle().lock().unwrap().len(), 1);
    assert!(fx.codes.codes_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_checkout_without_email() {
    let fx = Fixture::new();

    let outcome = fx.recorder().execute(checkout("sess_2", None)).await;
    assert!(
        matches!(outcome, Ok(RecordOutcome::Rejected(RejectReason::MissingEmail))),
        "expected Rejected(MissingEmail), got {outcome:?}"
    );
    assert!(fx.purchases.purchases_handle().lock().unwrap().is_empty());
    assert!(fx.codes.codes_handle().lock().unwrap().is_empty());

    settle().await;
    assert!(fx.notifier.sent_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_record_even_when_welcome_email_fails() {
    let fx = Fixture {
        notifier: MockNotifier::failing(),
        ..Fixture::new()
    };

    let outcome = fx.recorder().execute(checkout("sess_1", Some("b@x.com"))).await;
    assert!(matches!(outcome, Ok(RecordOutcome::Recorded)), "got {outcome:?}");
    assert_eq!(wait_for_emails(&fx.notifier.sent_handle(), 1).await.len(), 1);
    assert_eq!(fx.purchases.purchases_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_let_buyer_sign_in_with_welcome_code() {
    let fx = Fixture::new();
    fx.recorder()
        .execute(checkout("sess_1", Some("b@x.com")))
        .await
        .unwrap();
    let code = fx.codes.codes_handle().lock().unwrap()[0].code.clone();

    let verify = VerifyCodeUseCase {
        auth_codes: fx.codes.clone(),
        sessions: MockSessionRepo::empty(),
    };
    let out = verify
        .execute(VerifyCodeInput {
            email: "b@x.com".to_owned(),
            code,
        })
        .await;
    assert!(out.is_ok(), "expected Ok, got {out:?}");
}

// ── IngestPaymentEvent ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_ingest_completed_checkout() {
    let fx = Fixture::new();
    let payload = event(
        "checkout.session.completed",
        json!({
            "id": "sess_1",
            "customer_details": { "email": "B@X.com" },
            "amount_total": 9900,
            "currency": "eur",
        }),
    );

    let outcome = fx.ingest().execute(&payload).await;
    assert_eq!(outcome.unwrap(), IngestOutcome::Checkout(RecordOutcome::Recorded));

    let purchases = fx.purchases.purchases_handle().lock().unwrap().clone();
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0].email, "b@x.com");
}

#[tokio::test]
async fn should_fall_back_to_customer_email_field() {
    let fx = Fixture::new();
    let payload = event(
        "checkout.session.completed",
        json!({ "id": "sess_3", "customer_email": "c@x.com" }),
    );

    fx.ingest().execute(&payload).await.unwrap();
    assert_eq!(
        fx.purchases.purchases_handle().lock().unwrap()[0].email,
        "c@x.com"
    );
}

#[tokio::test]
async fn should_acknowledge_checkout_without_email() {
    let fx = Fixture::new();
    let payload = event(
        "checkout.session.completed",
        json!({ "id": "sess_2", "customer_details": { "email": "   " } }),
    );

    let outcome = fx.ingest().execute(&payload).await.unwrap();
    assert_eq!(
        outcome,
        IngestOutcome::Checkout(RecordOutcome::Rejected(RejectReason::MissingEmail))
    );
    assert!(fx.purchases.purchases_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_ignore_other_event_types() {
    let fx = Fixture::new();
    let payload = event("invoice.paid", json!({ "id": "in_1" }));

    let outcome = fx.ingest().execute(&payload).await.unwrap();
    assert_eq!(
        outcome,
        IngestOutcome::Ignored {
            event_type: "invoice.paid".to_owned()
        }
    );
    assert!(fx.purchases.purchases_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_malformed_checkout_object() {
    let fx = Fixture::new();
    let payload = event(
        "checkout.session.completed",
        json!({ "customer_email": "b@x.com" }),
    );

    let outcome = fx.ingest().execute(&payload).await.unwrap();
    assert_eq!(
        outcome,
        IngestOutcome::Checkout(RecordOutcome::Rejected(RejectReason::MalformedCheckout))
    );
    assert!(fx.purchases.purchases_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_ignore_envelopes_without_usable_type() {
    let fx = Fixture::new();

    let payloads: [&[u8]; 4] = [
        br#"{"type":"ping"}"#,
        br#"{"id":"evt_9","object":"event"}"#,
        br#"{"type":"invoice.paid","data":{}}"#,
        br#"{"type":42}"#,
    ];
    for payload in payloads {
        let outcome = fx.ingest().execute(payload).await;
        assert!(
            matches!(outcome, Ok(IngestOutcome::Ignored { .. })),
            "expected Ignored, got {outcome:?}"
        );
    }
    assert!(fx.purchases.purchases_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_checkout_without_data_object() {
    let fx = Fixture::new();

    let payloads: [&[u8]; 2] = [
        br#"{"type":"checkout.session.completed"}"#,
        br#"{"type":"checkout.session.completed","data":{}}"#,
    ];
    for payload in payloads {
        let outcome = fx.ingest().execute(payload).await.unwrap();
        assert_eq!(
            outcome,
            IngestOutcome::Checkout(RecordOutcome::Rejected(RejectReason::MalformedCheckout))
        );
    }
    assert!(fx.purchases.purchases_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_fail_on_non_json_payload() {
    let fx = Fixture::new();

    let payloads: [&[u8]; 3] = [b"not json", b"", b"{\"type\":"];
    for payload in payloads {
        let result = fx.ingest().execute(payload).await;
        assert!(
            matches!(result, Err(AcademyError::InvalidPayload)),
            "expected InvalidPayload, got {result:?}"
        );
    }
}
