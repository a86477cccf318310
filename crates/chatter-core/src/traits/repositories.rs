//! Repository traits - persistence contracts for domain entities
//!
//! One trait per entity with a consistent signature shape (find/create/
//! mutate/delete), so every storage backend implements the same contract
//! and the compiler enforces it. Multi-row mutations (user deletion,
//! message deletion, chatroom deletion, owner demotion/removal) are single
//! operations here because they must run inside one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Attachment, Chatroom, ChatroomMember, Message, User};
use crate::error::DomainError;
use crate::value_objects::{AttachmentId, ChatroomId, MessageId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Query parameters for chatroom history retrieval
///
/// `after` is the incremental-sync cursor: only messages with `id > after`
/// are returned. `limit` is off by default; callers that page set it.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageQuery {
    pub after: Option<MessageId>,
    pub limit: Option<i64>,
}

impl MessageQuery {
    /// Full history for a chatroom
    pub fn all() -> Self {
        Self::default()
    }

    /// Only messages newer than the given cursor
    pub fn since(cursor: MessageId) -> Self {
        Self {
            after: Some(cursor),
            limit: None,
        }
    }

    /// Cap the number of returned rows
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// What a successful user deletion touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserDeletion {
    /// Messages whose `sender_id` was reassigned to the sentinel
    pub reassigned_messages: u64,
    /// Membership rows removed
    pub removed_memberships: u64,
}

/// What a successful chatroom deletion touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChatroomDeletion {
    pub removed_messages: u64,
    pub removed_attachments: u64,
    pub removed_memberships: u64,
}

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Insert a new user with the signup defaults and a pre-hashed
    /// credential. Fails with `UsernameTaken` on a unique-constraint hit.
    async fn create(&self, username: &str, password_hash: &str) -> RepoResult<User>;

    /// Persist the mutable profile fields (username, last login).
    /// Fails with `UsernameTaken` if the new username collides.
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Set or clear the admin flag
    async fn set_admin(&self, id: UserId, admin: bool) -> RepoResult<()>;

    /// Set or clear the active flag
    async fn set_active(&self, id: UserId, active: bool) -> RepoResult<()>;

    /// Record a successful authentication instant
    async fn touch_last_login(&self, id: UserId, at: DateTime<Utc>) -> RepoResult<()>;

    /// Fetch the stored credential hash
    async fn password_hash(&self, id: UserId) -> RepoResult<String>;

    /// Replace the stored credential hash
    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()>;

    /// Delete a user in one transaction: verify every chatroom the target
    /// owns keeps another owner (else `SoleOwner`, nothing modified),
    /// reassign authored messages to the sentinel, remove the target's
    /// memberships, remove the row. The sentinel itself is refused with
    /// `ReservedUser`.
    async fn delete(&self, id: UserId) -> RepoResult<UserDeletion>;
}

/// Chatroom repository trait
#[async_trait]
pub trait ChatroomRepository: Send + Sync {
    /// Find a chatroom by ID
    async fn find_by_id(&self, id: ChatroomId) -> RepoResult<Option<Chatroom>>;

    /// Find a chatroom by its unique name
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Chatroom>>;

    /// Insert a chatroom and its founding owner membership in one
    /// transaction. Fails with `ChatroomNameTaken` on a name collision.
    async fn create(&self, name: &str, description: &str, founder: UserId)
        -> RepoResult<Chatroom>;

    /// Delete a chatroom and everything it owns (attachments of its
    /// messages, its messages, its membership rows) in one transaction
    async fn delete(&self, id: ChatroomId) -> RepoResult<ChatroomDeletion>;
}

/// Membership repository trait
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find a membership row by its composite key
    async fn find(&self, chatroom_id: ChatroomId, user_id: UserId)
        -> RepoResult<Option<ChatroomMember>>;

    /// Insert a membership row. Fails with `AlreadyMember` if the pair
    /// exists.
    async fn add(&self, member: &ChatroomMember) -> RepoResult<()>;

    /// Flip the owner flag. Demoting the last owner of a chatroom fails
    /// with `SoleOwner`, leaving the row untouched.
    async fn set_owner(&self, chatroom_id: ChatroomId, user_id: UserId, owner: bool)
        -> RepoResult<()>;

    /// Remove a membership row. Removing the last owner fails with
    /// `SoleOwner` while other members remain; the only member of a room
    /// may always leave (an empty room has no owner requirement).
    async fn remove(&self, chatroom_id: ChatroomId, user_id: UserId) -> RepoResult<()>;

    /// Users holding `owner = true` in the chatroom
    async fn owners_of(&self, chatroom_id: ChatroomId) -> RepoResult<Vec<User>>;

    /// Users holding `owner = false` in the chatroom
    async fn members_of(&self, chatroom_id: ChatroomId) -> RepoResult<Vec<User>>;

    /// All membership rows for a user
    async fn memberships_of(&self, user_id: UserId) -> RepoResult<Vec<ChatroomMember>>;

    /// Check whether any membership row exists for the pair
    async fn is_member(&self, chatroom_id: ChatroomId, user_id: UserId) -> RepoResult<bool>;

    /// Check whether an owner membership row exists for the pair
    async fn is_owner(&self, chatroom_id: ChatroomId, user_id: UserId) -> RepoResult<bool>;
}

/// Message repository trait
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find a message by ID
    async fn find_by_id(&self, id: MessageId) -> RepoResult<Option<Message>>;

    /// Insert a message row with a server-side timestamp chosen by the
    /// caller's clock
    async fn create(
        &self,
        chatroom_id: ChatroomId,
        sender_id: UserId,
        content: &str,
        sent_at: DateTime<Utc>,
    ) -> RepoResult<Message>;

    /// Messages for a chatroom ordered by id ascending, optionally
    /// restricted by the query's cursor and limit
    async fn for_chatroom(
        &self,
        chatroom_id: ChatroomId,
        query: MessageQuery,
    ) -> RepoResult<Vec<Message>>;

    /// Delete a message and each of its attachments in one transaction.
    /// Returns how many attachments went with it.
    async fn delete(&self, id: MessageId) -> RepoResult<u64>;
}

/// Attachment repository trait
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    /// Find an attachment by ID
    async fn find_by_id(&self, id: AttachmentId) -> RepoResult<Option<Attachment>>;

    /// Insert an attachment referencing an existing message
    async fn create(&self, message_id: MessageId, filepath: &str) -> RepoResult<Attachment>;

    /// Remove the row; the referenced file content is not touched
    async fn delete(&self, id: AttachmentId) -> RepoResult<()>;

    /// All attachments for a message in natural id order
    async fn for_message(&self, message_id: MessageId) -> RepoResult<Vec<Attachment>>;
}
