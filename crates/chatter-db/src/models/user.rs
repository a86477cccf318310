//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row shape returned by User queries.
///
/// The credential column is deliberately absent; it is only ever read
/// through [`crate::repositories::SqliteUserRepository`]'s dedicated
/// hash accessor and never leaves the database layer attached to a user.
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub admin: bool,
    pub active: bool,
}
