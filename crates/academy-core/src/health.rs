//! Probe endpoints mounted by every academy binary.

use axum::http::StatusCode;

/// `GET /healthz`: the process is up and serving HTTP.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz`: nothing to warm up, so readiness tracks liveness.
/// The database is not pinged here; a dead pool surfaces as 500s on real routes.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
