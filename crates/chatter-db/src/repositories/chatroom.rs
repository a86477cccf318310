//! Chatroom repository implementation

use async_trait::async_trait;
use chatter_core::{
    Chatroom, ChatroomDeletion, ChatroomId, ChatroomRepository, DomainError, RepoResult, UserId,
};
use sqlx::sqlite::SqlitePool;
use tracing::{info, instrument};

use super::error::{map_db_error, map_unique_violation};
use crate::models::ChatroomModel;

/// SQLite-backed chatroom repository
#[derive(Debug, Clone)]
pub struct SqliteChatroomRepository {
    pool: SqlitePool,
}

impl SqliteChatroomRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatroomRepository for SqliteChatroomRepository {
    async fn find_by_id(&self, id: ChatroomId) -> RepoResult<Option<Chatroom>> {
        let model = sqlx::query_as::<_, ChatroomModel>(
            "SELECT chatroomid AS id, name, description FROM Chatroom WHERE chatroomid = ?",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.map(Chatroom::from))
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Chatroom>> {
        let model = sqlx::query_as::<_, ChatroomModel>(
            "SELECT chatroomid AS id, name, description FROM Chatroom WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.map(Chatroom::from))
    }

    #[instrument(skip(self, description))]
    async fn create(
        &self,
        name: &str,
        description: &str,
        founder: UserId,
    ) -> RepoResult<Chatroom> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query("INSERT INTO Chatroom (name, description) VALUES (?, ?)")
            .bind(name)
            .bind(description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_unique_violation(e, || DomainError::ChatroomNameTaken(name.to_string()))
            })?;

        let chatroom_id = result.last_insert_rowid();

        // A room is never created ownerless; the founder goes in as owner
        // in the same transaction.
        sqlx::query("INSERT INTO ChatroomMember (chatroomid, userid, owner) VALUES (?, ?, 1)")
            .bind(chatroom_id)
            .bind(founder.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    DomainError::UserNotFound(founder)
                }
                _ => map_db_error(e),
            })?;

        tx.commit().await.map_err(map_db_error)?;

        info!(chatroom_id, founder = %founder, "chatroom created");
        Ok(Chatroom::new(ChatroomId::new(chatroom_id), name, description))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ChatroomId) -> RepoResult<ChatroomDeletion> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let removed_attachments = sqlx::query(
            "DELETE FROM Attachment WHERE messageid IN \
             (SELECT messageid FROM Message WHERE chatroomid = ?)",
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        let removed_messages = sqlx::query("DELETE FROM Message WHERE chatroomid = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        let removed_memberships = sqlx::query("DELETE FROM ChatroomMember WHERE chatroomid = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM Chatroom WHERE chatroomid = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        if deleted == 0 {
            return Err(DomainError::ChatroomNotFound(id));
        }

        tx.commit().await.map_err(map_db_error)?;

        info!(
            chatroom_id = %id,
            removed_messages,
            removed_attachments,
            removed_memberships,
            "chatroom deleted"
        );

        Ok(ChatroomDeletion {
            removed_messages,
            removed_attachments,
            removed_memberships,
        })
    }
}
