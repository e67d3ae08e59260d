//! HTTP-level tests over routes that answer before touching the database.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::ServiceExt;

use academy::infra::mailer::{AppNotifier, LogNotifier};
use academy::router::build_router;
use academy::state::AppState;

use crate::helpers::test_defaults;

fn app() -> Router {
    build_router(AppState {
        db: DatabaseConnection::Disconnected,
        notifier: AppNotifier::Log(LogNotifier),
        defaults: test_defaults(),
        cookie_domain: None,
    })
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn should_serve_banner_and_health() {
    let response = app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "status": "ok", "service": "academy" })
    );

    for path in ["/healthz", "/readyz"] {
        let response = app()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn should_echo_request_id() {
    let response = app()
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_reject_send_code_with_bad_email() {
    let response = app()
        .oneshot(json_request(
            Method::POST,
            "/auth/send-code",
            json!({ "email": "nope" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["kind"], "INVALID_EMAIL");
    assert_eq!(body["message"], "valid email required");
}

#[tokio::test]
async fn should_reject_verify_without_code() {
    let response = app()
        .oneshot(json_request(
            Method::POST,
            "/auth/verify-code",
            json!({ "email": "a@x.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["kind"], "MISSING_CODE");
}

#[tokio::test]
async fn should_require_token_for_session_routes() {
    for (method, path) in [
        (Method::GET, "/auth/session"),
        (Method::GET, "/api/access"),
        (Method::GET, "/api/progress"),
    ] {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
async fn should_clear_cookie_on_logout_without_session() {
    let response = app()
        .oneshot(
            Request::post("/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_owned();
    assert!(set_cookie.starts_with("session="), "{set_cookie}");
    assert!(set_cookie.contains("Max-Age=0"), "{set_cookie}");
    assert_eq!(body_json(response).await, json!({ "ok": true }));
}

#[tokio::test]
async fn should_reject_unparseable_webhook() {
    let response = app()
        .oneshot(
            Request::post("/webhooks/stripe")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["kind"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn should_acknowledge_ignored_webhook_events() {
    let events = [
        json!({ "type": "ping" }),
        json!({ "type": "invoice.paid", "data": {} }),
        json!({ "type": "invoice.paid", "data": { "object": { "id": "in_1" } } }),
        json!({
            "type": "checkout.session.completed",
            "data": { "object": { "id": "sess_2" } },
        }),
    ];
    for event in events {
        let response = app()
            .oneshot(json_request(Method::POST, "/webhooks/stripe", event))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "received": true }));
    }
}

#[tokio::test]
async fn should_map_malformed_auth_bodies_to_error_json() {
    let cases = [
        ("/auth/send-code", json!({ "email": 5 }), "INVALID_EMAIL"),
        ("/auth/verify-code", json!({ "email": "a@x.com", "code": 123456 }), "MISSING_CODE"),
    ];
    for (path, body, kind) in cases {
        let response = app()
            .oneshot(json_request(Method::POST, path, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(body_json(response).await["kind"], kind, "{path}");
    }

    // Not JSON, and no content type.
    let response = app()
        .oneshot(
            Request::post("/auth/send-code")
                .body(Body::from("email=a@x.com"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["kind"], "INVALID_EMAIL");
}

#[tokio::test]
async fn should_map_malformed_progress_body_to_error_json() {
    let response = app()
        .oneshot(
            Request::put("/api/progress")
                .header(header::AUTHORIZATION, "Bearer tok")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"completedLessons":"l1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["kind"], "INVALID_PAYLOAD");
}
