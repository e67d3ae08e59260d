use serde::Deserialize;

use academy_core::config::Config;

use crate::domain::types::CourseDefaults;

/// Academy service configuration loaded from environment variables
/// (field name upper-cased, e.g. `database_url` ← `DATABASE_URL`).
#[derive(Debug, Deserialize)]
pub struct AcademyConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on. Env var: `ACADEMY_PORT`.
    #[serde(default = "default_port")]
    pub academy_port: u16,
    /// Resend API key. When unset, outgoing mail is only logged.
    #[serde(default)]
    pub resend_api_key: Option<String>,
    /// `From` header for outgoing mail.
    #[serde(default = "default_email_from")]
    pub email_from: String,
    #[serde(default)]
    pub email_reply_to: Option<String>,
    /// Public URL of the course frontend; the welcome mail links to `{app_url}/login`.
    #[serde(default = "default_app_url")]
    pub app_url: String,
    /// Cookie domain attribute. Host-only cookie when unset.
    #[serde(default)]
    pub cookie_domain: Option<String>,
    #[serde(default = "default_course_slug")]
    pub default_course_slug: String,
    #[serde(default = "default_course_title")]
    pub default_course_title: String,
    /// Minor currency units.
    #[serde(default = "default_price_amount")]
    pub default_price_amount: i64,
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

impl Config for AcademyConfig {}

impl AcademyConfig {
    pub fn course_defaults(&self) -> CourseDefaults {
        CourseDefaults {
            course_slug: self.default_course_slug.clone(),
            course_title: self.default_course_title.clone(),
            amount: self.default_price_amount,
            currency: self.default_currency.clone(),
            app_url: self.app_url.trim_end_matches('/').to_owned(),
        }
    }
}

fn default_port() -> u16 {
    8787
}

fn default_email_from() -> String {
    "Academy <academy@example.com>".to_owned()
}

fn default_app_url() -> String {
    "http://localhost:3000".to_owned()
}

fn default_course_slug() -> String {
    "openclaw-beginner-course".to_owned()
}

fn default_course_title() -> String {
    "OpenClaw Beginner Course".to_owned()
}

fn default_price_amount() -> i64 {
    9900
}

fn default_currency() -> String {
    "eur".to_owned()
}
