//! Attachment database model

use sqlx::FromRow;

/// Row shape returned by Attachment queries.
#[derive(Debug, Clone, FromRow)]
pub struct AttachmentModel {
    pub id: i64,
    pub message_id: i64,
    pub filepath: String,
}
