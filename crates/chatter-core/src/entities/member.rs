//! Membership entity - the (chatroom, user) junction row with its owner flag

use crate::value_objects::{ChatroomId, UserId};

/// Chatroom membership entity (junction between User and Chatroom)
///
/// The owner flag carries the one invariant this layer must never violate:
/// a chatroom that has membership rows always keeps at least one row with
/// `owner = true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatroomMember {
    pub chatroom_id: ChatroomId,
    pub user_id: UserId,
    pub owner: bool,
}

impl ChatroomMember {
    /// Create a plain membership
    pub fn new(chatroom_id: ChatroomId, user_id: UserId) -> Self {
        Self {
            chatroom_id,
            user_id,
            owner: false,
        }
    }

    /// Create an owner membership
    pub fn new_owner(chatroom_id: ChatroomId, user_id: UserId) -> Self {
        Self {
            chatroom_id,
            user_id,
            owner: true,
        }
    }
}
