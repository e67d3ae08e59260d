//! Bearer credential extractor for the opaque session token.

use axum::extract::FromRequestParts;
use axum_extra::extract::CookieJar;
use http::request::Parts;
use http::{HeaderMap, StatusCode, header::AUTHORIZATION};

use crate::cookie::SESSION_COOKIE;

/// Opaque session token presented by the client.
///
/// Read from the `session` cookie first, then from `Authorization: Bearer <token>`.
/// Returns 401 when neither is present. Whether the token is valid is up to the
/// session store; this type only carries it.
#[derive(Clone)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let jar = CookieJar::from_headers(headers);
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            let value = cookie.value().trim();
            if !value.is_empty() {
                return Some(Self(value.to_owned()));
            }
        }

        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| Self(v.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the token itself.
impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // Resolve synchronously and hand back a 'static future so the returned
    // future does not borrow `parts`.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = Self::from_headers(&parts.headers);
        async move { token.ok_or(StatusCode::UNAUTHORIZED) }
    }
}
