//! Chatroom entity - room identity and metadata

use crate::value_objects::ChatroomId;

/// Chatroom entity
///
/// Carries identity and metadata only. Owner and member lists, and the
/// message history, are separately loaded views: constructing a Chatroom is
/// O(1) regardless of how many rows relate to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chatroom {
    pub id: ChatroomId,
    pub name: String,
    pub description: String,
}

impl Chatroom {
    /// Create a Chatroom
    pub fn new(id: ChatroomId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }
}
