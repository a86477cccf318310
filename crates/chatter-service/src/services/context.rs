//! Service context - dependency container for services
//!
//! Holds the connection pool and the repositories every service works
//! through.

use std::sync::Arc;

use chatter_core::{
    AttachmentRepository, ChatroomRepository, MemberRepository, MessageRepository, UserRepository,
};
use chatter_db::{
    SqliteAttachmentRepository, SqliteChatroomRepository, SqliteMemberRepository,
    SqliteMessageRepository, SqlitePool, SqliteUserRepository,
};

/// Service context containing all dependencies
///
/// Repositories are held behind trait objects so tests and alternative
/// backends can inject their own implementations.
#[derive(Clone)]
pub struct ServiceContext {
    pool: SqlitePool,
    user_repo: Arc<dyn UserRepository>,
    chatroom_repo: Arc<dyn ChatroomRepository>,
    member_repo: Arc<dyn MemberRepository>,
    message_repo: Arc<dyn MessageRepository>,
    attachment_repo: Arc<dyn AttachmentRepository>,
}

impl ServiceContext {
    /// Create a new service context with explicit dependencies
    pub fn new(
        pool: SqlitePool,
        user_repo: Arc<dyn UserRepository>,
        chatroom_repo: Arc<dyn ChatroomRepository>,
        member_repo: Arc<dyn MemberRepository>,
        message_repo: Arc<dyn MessageRepository>,
        attachment_repo: Arc<dyn AttachmentRepository>,
    ) -> Self {
        Self {
            pool,
            user_repo,
            chatroom_repo,
            member_repo,
            message_repo,
            attachment_repo,
        }
    }

    /// Wire every repository to its SQLite implementation over one pool
    pub fn with_sqlite(pool: SqlitePool) -> Self {
        Self::new(
            pool.clone(),
            Arc::new(SqliteUserRepository::new(pool.clone())),
            Arc::new(SqliteChatroomRepository::new(pool.clone())),
            Arc::new(SqliteMemberRepository::new(pool.clone())),
            Arc::new(SqliteMessageRepository::new(pool.clone())),
            Arc::new(SqliteAttachmentRepository::new(pool)),
        )
    }

    /// Get the database connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the chatroom repository
    pub fn chatroom_repo(&self) -> &dyn ChatroomRepository {
        self.chatroom_repo.as_ref()
    }

    /// Get the membership repository
    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the attachment repository
    pub fn attachment_repo(&self) -> &dyn AttachmentRepository {
        self.attachment_repo.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"SqlitePool")
            .field("repositories", &"...")
            .finish()
    }
}
