//! Attachment repository implementation

use async_trait::async_trait;
use chatter_core::{
    Attachment, AttachmentId, AttachmentRepository, DomainError, MessageId, RepoResult,
};
use sqlx::sqlite::SqlitePool;

use super::error::map_db_error;
use crate::models::AttachmentModel;

/// SQLite-backed attachment repository
#[derive(Debug, Clone)]
pub struct SqliteAttachmentRepository {
    pool: SqlitePool,
}

impl SqliteAttachmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttachmentRepository for SqliteAttachmentRepository {
    async fn find_by_id(&self, id: AttachmentId) -> RepoResult<Option<Attachment>> {
        let model = sqlx::query_as::<_, AttachmentModel>(
            "SELECT attachmentid AS id, messageid AS message_id, filepath \
             FROM Attachment WHERE attachmentid = ?",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.map(Attachment::from))
    }

    async fn create(&self, message_id: MessageId, filepath: &str) -> RepoResult<Attachment> {
        let result = sqlx::query("INSERT INTO Attachment (messageid, filepath) VALUES (?, ?)")
            .bind(message_id.into_inner())
            .bind(filepath)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    DomainError::MessageNotFound(message_id)
                }
                _ => map_db_error(e),
            })?;

        Ok(Attachment {
            id: AttachmentId::new(result.last_insert_rowid()),
            message_id,
            filepath: filepath.to_string(),
        })
    }

    async fn delete(&self, id: AttachmentId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM Attachment WHERE attachmentid = ?")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AttachmentNotFound(id));
        }
        Ok(())
    }

    async fn for_message(&self, message_id: MessageId) -> RepoResult<Vec<Attachment>> {
        let models = sqlx::query_as::<_, AttachmentModel>(
            "SELECT attachmentid AS id, messageid AS message_id, filepath \
             FROM Attachment WHERE messageid = ? ORDER BY attachmentid",
        )
        .bind(message_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(Attachment::from).collect())
    }
}
