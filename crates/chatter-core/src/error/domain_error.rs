//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{AttachmentId, ChatroomId, MessageId, UserId};

/// Domain layer errors
///
/// Every fallible operation in the system surfaces one of these kinds.
/// Validation failures are raised before any write; multi-step mutations
/// roll back entirely when any step fails, so an error always means the
/// store is exactly as it was before the call.
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Chatroom not found: {0}")]
    ChatroomNotFound(ChatroomId),

    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    #[error("Attachment not found: {0}")]
    AttachmentNotFound(AttachmentId),

    #[error("User {user_id} is not a member of chatroom {chatroom_id}")]
    MembershipNotFound {
        chatroom_id: ChatroomId,
        user_id: UserId,
    },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Password must be at least 8 characters")]
    WeakPassword,

    #[error("Message content cannot be empty")]
    EmptyMessage,

    // =========================================================================
    // Authentication & Authorization Errors
    // =========================================================================
    /// Deliberately uniform: wrong password, unknown username, and inactive
    /// account are indistinguishable to the caller.
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Current password does not match")]
    PasswordMismatch,

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Chatroom name already taken: {0}")]
    ChatroomNameTaken(String),

    #[error("User {user_id} is already a member of chatroom {chatroom_id}")]
    AlreadyMember {
        chatroom_id: ChatroomId,
        user_id: UserId,
    },

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    /// The operation would leave the named chatrooms with members but no
    /// owner, a forbidden state.
    #[error("Would leave chatrooms without an owner: {}", chatrooms.join(", "))]
    SoleOwner { chatrooms: Vec<String> },

    #[error("User {0} is reserved and cannot be modified")]
    ReservedUser(UserId),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    /// Transaction or lock failure from the storage engine. The only kind a
    /// caller may retry with a fresh call.
    #[error("Storage conflict: {0}")]
    StorageConflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for calling layers
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ChatroomNotFound(_) => "UNKNOWN_CHATROOM",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::AttachmentNotFound(_) => "UNKNOWN_ATTACHMENT",
            Self::MembershipNotFound { .. } => "UNKNOWN_MEMBERSHIP",

            // Validation
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::EmptyMessage => "EMPTY_MESSAGE",

            // Authentication & Authorization
            Self::AuthenticationFailed => "AUTHENTICATION_FAILED",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
            Self::NotAuthorized(_) => "NOT_AUTHORIZED",

            // Conflict
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::ChatroomNameTaken(_) => "CHATROOM_NAME_TAKEN",
            Self::AlreadyMember { .. } => "ALREADY_MEMBER",

            // Business Rules
            Self::SoleOwner { .. } => "SOLE_OWNER",
            Self::ReservedUser(_) => "RESERVED_USER",

            // Infrastructure
            Self::StorageConflict(_) => "STORAGE_CONFLICT",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::ChatroomNotFound(_)
                | Self::MessageNotFound(_)
                | Self::AttachmentNotFound(_)
                | Self::MembershipNotFound { .. }
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::WeakPassword | Self::EmptyMessage)
    }

    /// Check if this is an authentication or authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed | Self::PasswordMismatch | Self::NotAuthorized(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::UsernameTaken(_)
                | Self::ChatroomNameTaken(_)
                | Self::AlreadyMember { .. }
                | Self::SoleOwner { .. }
                | Self::ReservedUser(_)
                | Self::StorageConflict(_)
        )
    }

    /// Check if the caller may retry the operation with a fresh call.
    /// Business-rule rejections are final; only engine-level conflicts are
    /// transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageConflict(_))
    }
}
