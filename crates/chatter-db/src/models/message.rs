//! Message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row shape returned by Message queries.
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub content: String,
    pub chatroom_id: i64,
    pub sender_id: i64,
    pub sent_at: DateTime<Utc>,
}
