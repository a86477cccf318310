//! Chatroom membership database model

use sqlx::FromRow;

/// Row shape returned by ChatroomMember queries.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct MemberModel {
    pub chatroom_id: i64,
    pub user_id: i64,
    pub owner: bool,
}
