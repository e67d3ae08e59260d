use tracing::{info, warn};

use crate::domain::repository::Notifier;
use crate::domain::types::{LOGIN_CODE_TTL_SECS, OutgoingEmail, WELCOME_CODE_TTL_SECS};

/// Hand an email to the notifier on a detached task.
///
/// The caller's outcome never depends on delivery; failures end up in the log.
pub fn dispatch<N>(notifier: &N, email: OutgoingEmail, kind: &'static str)
where
    N: Notifier + Clone + 'static,
{
    let notifier = notifier.clone();
    tokio::spawn(async move {
        let to = email.to.clone();
        match notifier.send(email).await {
            Ok(()) => info!(kind, to = %to, "email sent"),
            Err(e) => warn!(kind, to = %to, error = %e, "failed to send email"),
        }
    });
}

pub fn login_code_email(to: &str, code: &str) -> OutgoingEmail {
    let minutes = LOGIN_CODE_TTL_SECS / 60;
    OutgoingEmail {
        to: to.to_owned(),
        subject: format!("Your login code: {code}"),
        html: format!(
            r#"<div style="font-family: sans-serif; max-width: 400px; margin: 0 auto; padding: 40px 20px;">
  <h2 style="color: #1e1b4b;">Your login code</h2>
  <p style="font-size: 36px; font-weight: bold; letter-spacing: 8px; color: #7c3aed; margin: 24px 0;">{code}</p>
  <p style="color: #64748b;">This code expires in {minutes} minutes.</p>
</div>"#
        ),
    }
}

pub fn welcome_email(to: &str, code: &str, course_title: &str, app_url: &str) -> OutgoingEmail {
    let hours = WELCOME_CODE_TTL_SECS / 3600;
    let login_url = format!("{app_url}/login");
    OutgoingEmail {
        to: to.to_owned(),
        subject: format!("Welcome to the {course_title}!"),
        html: format!(
            r#"<div style="font-family: sans-serif; max-width: 500px; margin: 0 auto; padding: 40px 20px;">
  <h1 style="color: #1e1b4b; font-size: 24px;">Welcome aboard!</h1>
  <p style="color: #374151; font-size: 16px; line-height: 1.6;">
    Thank you for purchasing the <strong>{course_title}</strong>.
    Log in at <a href="{login_url}" style="color: #7c3aed;">{login_url}</a> with this email address.
  </p>
  <p style="color: #374151; font-size: 16px;">Your one-time login code:</p>
  <p style="font-size: 36px; font-weight: bold; letter-spacing: 8px; color: #7c3aed; margin: 24px 0; text-align: center;">{code}</p>
  <p style="color: #6b7280; font-size: 14px;">This code expires in {hours} hours. You can always request a new one on the login page.</p>
</div>"#
        ),
    }
}
