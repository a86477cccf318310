//! User entity - account identity and status flags

use chrono::{DateTime, Utc};

use crate::value_objects::UserId;

/// User entity
///
/// The credential is deliberately not a field: it is stored only as a salted
/// hash and reachable through the repository's credential accessors, so an
/// entity value can never leak a secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// None until the first successful authentication.
    pub last_login_at: Option<DateTime<Utc>>,
    pub admin: bool,
    pub active: bool,
}

impl User {
    /// Username of the reserved id-0 row that absorbs message attribution
    /// when an author is deleted.
    pub const SENTINEL_USERNAME: &'static str = "DeletedUser";

    /// Create a User with the signup defaults
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            last_login_at: None,
            admin: false,
            active: true,
        }
    }

    /// The reserved sentinel value as seeded at schema initialization
    pub fn sentinel() -> Self {
        Self {
            id: UserId::SENTINEL,
            username: Self::SENTINEL_USERNAME.to_string(),
            last_login_at: None,
            admin: false,
            active: false,
        }
    }

    /// Check whether this is the reserved sentinel account
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.id.is_sentinel()
    }

    /// Record a successful login instant
    pub fn record_login(&mut self, at: DateTime<Utc>) {
        self.last_login_at = Some(at);
    }

    /// Check whether the account has ever authenticated
    #[inline]
    pub fn has_logged_in(&self) -> bool {
        self.last_login_at.is_some()
    }
}
