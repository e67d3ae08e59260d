use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use tracing::{info, warn};
use uuid::Uuid;

use academy_auth_types::cookie::SESSION_TTL_SECS;

use crate::domain::repository::{AuthCodeRepository, SessionRepository};
use crate::domain::types::{SESSION_TOKEN_BYTES, Session, normalize_email};
use crate::error::AcademyError;

/// 256 random bits, base64url without padding (43 chars).
pub fn generate_session_token() -> String {
    let bytes: [u8; SESSION_TOKEN_BYTES] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Resolve a bearer token to the signed-in email, or `NotAuthenticated`.
pub async fn authenticate<S>(sessions: &S, token: &str) -> Result<String, AcademyError>
where
    S: SessionRepository,
{
    sessions
        .find_active(token)
        .await?
        .map(|s| s.email)
        .ok_or(AcademyError::NotAuthenticated)
}

// ── VerifyCode (login) ───────────────────────────────────────────────────────

pub struct VerifyCodeInput {
    pub email: String,
    pub code: String,
}

#[derive(Debug)]
pub struct VerifyCodeOutput {
    pub email: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct VerifyCodeUseCase<A: AuthCodeRepository, S: SessionRepository> {
    pub auth_codes: A,
    pub sessions: S,
}

impl<A: AuthCodeRepository, S: SessionRepository> VerifyCodeUseCase<A, S> {
    pub async fn execute(&self, input: VerifyCodeInput) -> Result<VerifyCodeOutput, AcademyError> {
        let code = input.code.trim();
        if input.email.trim().is_empty() || code.is_empty() {
            return Err(AcademyError::MissingCode);
        }
        let email = normalize_email(&input.email).ok_or(AcademyError::InvalidEmail)?;

        let auth_code = self
            .auth_codes
            .find_valid(&email, code)
            .await?
            .ok_or(AcademyError::InvalidOrExpiredCode)?;

        // Losing the conditional update means a concurrent request consumed it first.
        if !self.auth_codes.consume(auth_code.id).await? {
            warn!(code_id = %auth_code.id, "auth code consumed concurrently");
            return Err(AcademyError::InvalidOrExpiredCode);
        }

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            email: email.clone(),
            token: generate_session_token(),
            expires_at: now + Duration::seconds(SESSION_TTL_SECS),
            created_at: now,
        };
        self.sessions.create(&session).await?;

        info!(session_id = %session.id, "session created");
        Ok(VerifyCodeOutput {
            email,
            token: session.token,
            expires_at: session.expires_at,
        })
    }
}

// ── CheckSession ─────────────────────────────────────────────────────────────

pub struct CheckSessionUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> CheckSessionUseCase<S> {
    /// Email of the live session, `None` when the token is unknown or expired.
    pub async fn execute(&self, token: &str) -> Result<Option<String>, AcademyError> {
        Ok(self.sessions.find_active(token).await?.map(|s| s.email))
    }
}

// ── RevokeSession (logout) ───────────────────────────────────────────────────

pub struct RevokeSessionUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> RevokeSessionUseCase<S> {
    /// Idempotent: revoking an unknown token is a no-op.
    pub async fn execute(&self, token: &str) -> Result<(), AcademyError> {
        if self.sessions.delete_by_token(token).await? {
            info!("session revoked");
        }
        Ok(())
    }
}
