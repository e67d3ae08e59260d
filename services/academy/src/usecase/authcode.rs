use chrono::{Duration, Utc};
use rand::RngExt;
use tracing::info;
use uuid::Uuid;

use crate::domain::repository::{AuthCodeRepository, Notifier};
use crate::domain::types::{AUTHCODE_LEN, AuthCode, LOGIN_CODE_TTL_SECS, normalize_email};
use crate::error::AcademyError;
use crate::usecase::notification::{dispatch, login_code_email};

/// Uniform over 000000..=999999 from the thread-local CSPRNG.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    let n: u32 = rng.random_range(0..1_000_000);
    format!("{n:0width$}", width = AUTHCODE_LEN)
}

/// Supersede every unused code for `email` and persist a fresh one.
///
/// Two statements, no transaction: two concurrent callers can briefly leave two
/// usable codes. Verification picks the newest, and single use is enforced by
/// `AuthCodeRepository::consume`, so the window only matters for usability.
pub async fn issue_code<A>(
    auth_codes: &A,
    email: &str,
    ttl: Duration,
) -> Result<AuthCode, AcademyError>
where
    A: AuthCodeRepository,
{
    let invalidated = auth_codes.invalidate_unused(email).await?;

    let now = Utc::now();
    let code = AuthCode {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        code: generate_code(),
        expires_at: now + ttl,
        used: false,
        created_at: now,
    };
    auth_codes.create(&code).await?;

    info!(code_id = %code.id, invalidated, "auth code issued");
    Ok(code)
}

pub struct SendCodeInput {
    pub email: String,
}

pub struct SendCodeUseCase<A, N>
where
    A: AuthCodeRepository,
    N: Notifier + Clone + 'static,
{
    pub auth_codes: A,
    pub notifier: N,
}

impl<A, N> SendCodeUseCase<A, N>
where
    A: AuthCodeRepository,
    N: Notifier + Clone + 'static,
{
    pub async fn execute(&self, input: SendCodeInput) -> Result<(), AcademyError> {
        let email = normalize_email(&input.email).ok_or(AcademyError::InvalidEmail)?;

        let code = issue_code(
            &self.auth_codes,
            &email,
            Duration::seconds(LOGIN_CODE_TTL_SECS),
        )
        .await?;

        dispatch(
            &self.notifier,
            login_code_email(&email, &code.code),
            "login_code",
        );
        Ok(())
    }
}
