//! Message repository implementation

use async_trait::async_trait;
use chatter_core::{
    ChatroomId, DomainError, Message, MessageId, MessageQuery, MessageRepository, RepoResult,
    UserId,
};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use tracing::{info, instrument};

use super::error::map_db_error;
use crate::models::MessageModel;

/// SQLite-backed message repository
#[derive(Debug, Clone)]
pub struct SqliteMessageRepository {
    pool: SqlitePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for SqliteMessageRepository {
    async fn find_by_id(&self, id: MessageId) -> RepoResult<Option<Message>> {
        let model = sqlx::query_as::<_, MessageModel>(
            "SELECT messageid AS id, content, chatroomid AS chatroom_id, \
                    senderid AS sender_id, timestamp AS sent_at \
             FROM Message WHERE messageid = ?",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.map(Message::from))
    }

    async fn create(
        &self,
        chatroom_id: ChatroomId,
        sender_id: UserId,
        content: &str,
        sent_at: DateTime<Utc>,
    ) -> RepoResult<Message> {
        let result = sqlx::query(
            "INSERT INTO Message (content, chatroomid, senderid, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(content)
        .bind(chatroom_id.into_inner())
        .bind(sender_id.into_inner())
        .bind(sent_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Message {
            id: MessageId::new(result.last_insert_rowid()),
            content: content.to_string(),
            chatroom_id,
            sender_id,
            sent_at,
        })
    }

    async fn for_chatroom(
        &self,
        chatroom_id: ChatroomId,
        query: MessageQuery,
    ) -> RepoResult<Vec<Message>> {
        // One query serves full history and incremental sync: an absent
        // cursor becomes id > 0 (real ids start at 1) and an absent limit
        // becomes LIMIT -1, which SQLite reads as unlimited.
        let after = query.after.map_or(0, MessageId::into_inner);
        let limit = query.limit.unwrap_or(-1);

        let models = sqlx::query_as::<_, MessageModel>(
            "SELECT messageid AS id, content, chatroomid AS chatroom_id, \
                    senderid AS sender_id, timestamp AS sent_at \
             FROM Message WHERE chatroomid = ? AND messageid > ? \
             ORDER BY messageid ASC LIMIT ?",
        )
        .bind(chatroom_id.into_inner())
        .bind(after)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: MessageId) -> RepoResult<u64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Attachments go one row at a time, oldest first, so any future
        // per-attachment cleanup hook sees each removal on its own.
        let attachment_ids: Vec<i64> = sqlx::query_scalar(
            "SELECT attachmentid FROM Attachment WHERE messageid = ? ORDER BY attachmentid",
        )
        .bind(id.into_inner())
        .fetch_all(&mut *tx)
        .await
        .map_err(map_db_error)?;

        for attachment_id in &attachment_ids {
            sqlx::query("DELETE FROM Attachment WHERE attachmentid = ?")
                .bind(attachment_id)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        }

        let deleted = sqlx::query("DELETE FROM Message WHERE messageid = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        if deleted == 0 {
            return Err(DomainError::MessageNotFound(id));
        }

        tx.commit().await.map_err(map_db_error)?;

        let removed_attachments = attachment_ids.len() as u64;
        info!(message_id = %id, removed_attachments, "message deleted");
        Ok(removed_attachments)
    }
}
