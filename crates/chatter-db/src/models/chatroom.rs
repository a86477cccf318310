//! Chatroom database model

use sqlx::FromRow;

/// Row shape returned by Chatroom queries.
#[derive(Debug, Clone, FromRow)]
pub struct ChatroomModel {
    pub id: i64,
    pub name: String,
    pub description: String,
}
