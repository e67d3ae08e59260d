use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Academy service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AcademyError {
    #[error("valid email required")]
    InvalidEmail,
    #[error("email and code required")]
    MissingCode,
    #[error("invalid payload")]
    InvalidPayload,
    /// Deliberately covers wrong, used, superseded and expired codes alike.
    #[error("invalid or expired code")]
    InvalidOrExpiredCode,
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AcademyError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::MissingCode => "MISSING_CODE",
            Self::InvalidPayload => "INVALID_PAYLOAD",
            Self::InvalidOrExpiredCode => "INVALID_OR_EXPIRED_CODE",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AcademyError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidEmail | Self::MissingCode | Self::InvalidPayload => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidOrExpiredCode | Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are expected client errors and already visible through TraceLayer.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

/// Failure to hand a message to the email provider. Never surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("email request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("email provider returned {status}: {body}")]
    Rejected { status: u16, body: String },
}
