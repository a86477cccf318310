//! Chatroom model mappers

use chatter_core::{Chatroom, ChatroomId};

use crate::models::ChatroomModel;

impl From<ChatroomModel> for Chatroom {
    fn from(model: ChatroomModel) -> Self {
        Self {
            id: ChatroomId::new(model.id),
            name: model.name,
            description: model.description,
        }
    }
}
