//! Message and attachment model mappers

use chatter_core::{Attachment, AttachmentId, ChatroomId, Message, MessageId, UserId};

use crate::models::{AttachmentModel, MessageModel};

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Self {
            id: MessageId::new(model.id),
            content: model.content,
            chatroom_id: ChatroomId::new(model.chatroom_id),
            sender_id: UserId::new(model.sender_id),
            sent_at: model.sent_at,
        }
    }
}

impl From<AttachmentModel> for Attachment {
    fn from(model: AttachmentModel) -> Self {
        Self {
            id: AttachmentId::new(model.id),
            message_id: MessageId::new(model.message_id),
            filepath: model.filepath,
        }
    }
}
