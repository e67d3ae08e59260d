//! sea-orm entities for the academy database.

pub mod auth_codes;
pub mod purchases;
pub mod sessions;
pub mod user_progress;
