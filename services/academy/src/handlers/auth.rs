use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use academy_auth_types::cookie::{clear_session_cookie, set_session_cookie};
use academy_auth_types::credential::SessionToken;

use crate::error::AcademyError;
use crate::state::AppState;
use crate::usecase::authcode::{SendCodeInput, SendCodeUseCase};
use crate::usecase::session::{
    CheckSessionUseCase, RevokeSessionUseCase, VerifyCodeInput, VerifyCodeUseCase,
};

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// ── POST /auth/send-code ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendCodeRequest {
    #[serde(default)]
    pub email: Option<String>,
}

pub async fn send_code(
    State(state): State<AppState>,
    payload: Result<Json<SendCodeRequest>, JsonRejection>,
) -> Result<Json<OkResponse>, AcademyError> {
    // A body that is not `{email: string}` carries no usable email.
    let Json(body) = payload.map_err(|_| AcademyError::InvalidEmail)?;
    let usecase = SendCodeUseCase {
        auth_codes: state.auth_code_repo(),
        notifier: state.notifier(),
    };
    usecase
        .execute(SendCodeInput {
            email: body.email.unwrap_or_default(),
        })
        .await?;
    Ok(Json(OkResponse {
        ok: true,
        message: Some("Code sent"),
        email: None,
    }))
}

// ── POST /auth/verify-code ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

pub async fn verify_code(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<VerifyCodeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AcademyError> {
    let Json(body) = payload.map_err(|_| AcademyError::MissingCode)?;
    let usecase = VerifyCodeUseCase {
        auth_codes: state.auth_code_repo(),
        sessions: state.session_repo(),
    };
    let out = usecase
        .execute(VerifyCodeInput {
            email: body.email.unwrap_or_default(),
            code: body.code.unwrap_or_default(),
        })
        .await?;

    let jar = set_session_cookie(jar, out.token, state.cookie_domain.clone());
    Ok((
        jar,
        Json(OkResponse {
            ok: true,
            message: None,
            email: Some(out.email),
        }),
    ))
}

// ── GET /auth/session ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub email: String,
}

pub async fn get_session(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<Json<SessionResponse>, AcademyError> {
    let usecase = CheckSessionUseCase {
        sessions: state.session_repo(),
    };
    let email = usecase
        .execute(token.as_str())
        .await?
        .ok_or(AcademyError::NotAuthenticated)?;
    Ok(Json(SessionResponse {
        authenticated: true,
        email,
    }))
}

// ── POST /auth/logout ─────────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<impl IntoResponse, AcademyError> {
    if let Some(token) = SessionToken::from_headers(&headers) {
        let usecase = RevokeSessionUseCase {
            sessions: state.session_repo(),
        };
        usecase.execute(token.as_str()).await?;
    }
    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    Ok((
        StatusCode::OK,
        jar,
        Json(OkResponse {
            ok: true,
            message: None,
            email: None,
        }),
    ))
}
