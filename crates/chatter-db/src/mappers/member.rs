//! Chatroom membership model mappers

use chatter_core::{ChatroomId, ChatroomMember, UserId};

use crate::models::MemberModel;

impl From<MemberModel> for ChatroomMember {
    fn from(model: MemberModel) -> Self {
        Self {
            chatroom_id: ChatroomId::new(model.chatroom_id),
            user_id: UserId::new(model.user_id),
            owner: model.owner,
        }
    }
}
