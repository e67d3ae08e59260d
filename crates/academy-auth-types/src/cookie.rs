//! Cookie builders for the session token.
//!
//! The course frontend lives on a different origin than the API, so the
//! cookie is `SameSite=None` and therefore must be `Secure`.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name carrying the opaque session token.
pub const SESSION_COOKIE: &str = "session";

/// Session lifetime in seconds (30 days). Used for both the stored session and cookie Max-Age.
pub const SESSION_TTL_SECS: i64 = 30 * 24 * 60 * 60;

fn base_cookie(value: String, domain: Option<String>) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None);
    if let Some(domain) = domain {
        builder = builder.domain(domain);
    }
    builder.build()
}

/// Set the session cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use academy_auth_types::cookie::{set_session_cookie, SESSION_COOKIE, SESSION_TTL_SECS};
///
/// let jar = set_session_cookie(CookieJar::new(), "token".to_string(), None);
/// let cookie = jar.get(SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(SESSION_TTL_SECS)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, value: String, domain: Option<String>) -> CookieJar {
    let mut cookie = base_cookie(value, domain);
    cookie.set_max_age(Duration::seconds(SESSION_TTL_SECS));
    jar.add(cookie)
}

/// Clear the session cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use academy_auth_types::cookie::{clear_session_cookie, set_session_cookie, SESSION_COOKIE};
///
/// let jar = set_session_cookie(CookieJar::new(), "token".to_string(), None);
/// let jar = clear_session_cookie(jar, None);
/// let cookie = jar.get(SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// assert_eq!(cookie.value(), "");
/// ```
pub fn clear_session_cookie(jar: CookieJar, domain: Option<String>) -> CookieJar {
    let mut cookie = base_cookie(String::new(), domain);
    cookie.set_max_age(Duration::ZERO);
    jar.add(cookie)
}
