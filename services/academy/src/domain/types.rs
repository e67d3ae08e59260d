use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One-time login code delivered by email.
#[derive(Debug, Clone)]
pub struct AuthCode {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl AuthCode {
    pub fn is_valid(&self) -> bool {
        !self.used && self.expires_at > Utc::now()
    }
}

/// Signed-in session. `token` is a bearer secret: never log it.
#[derive(Clone)]
pub struct Session {
    pub id: Uuid,
    pub email: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseStatus {
    Completed,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Recorded course purchase. `external_session_id` is the processor's checkout id.
#[derive(Debug, Clone)]
pub struct Purchase {
    pub id: Uuid,
    pub email: String,
    pub external_session_id: String,
    pub external_customer_id: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub course_slug: String,
    pub status: PurchaseStatus,
    pub created_at: DateTime<Utc>,
}

/// Result of inserting a purchase against the unique `external_session_id` index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseProgress {
    pub email: String,
    pub course_slug: String,
    pub completed_lessons: Vec<String>,
    pub completed_modules: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Email handed to the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Fallbacks used when a checkout event or request omits course details.
#[derive(Debug, Clone)]
pub struct CourseDefaults {
    pub course_slug: String,
    pub course_title: String,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    /// Frontend base URL without trailing slash.
    pub app_url: String,
}

/// Login code length (decimal digits).
pub const AUTHCODE_LEN: usize = 6;

/// Login code time-to-live in seconds (10 minutes).
pub const LOGIN_CODE_TTL_SECS: i64 = 10 * 60;

/// Post-purchase welcome code time-to-live in seconds (24 hours).
pub const WELCOME_CODE_TTL_SECS: i64 = 24 * 60 * 60;

/// Random bytes behind a session token (256 bits).
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Trim + lowercase. Returns `None` for anything that cannot be an address.
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    Some(email)
}
