//! Message service
//!
//! Posting into chatrooms, message lookup, and message deletion with its
//! attachment cascade.

use chatter_core::{
    Attachment, ChatroomId, DomainError, Message, MessageId, RepoResult, UserId,
};
use chrono::Utc;
use tracing::{info, instrument, warn};

use super::context::ServiceContext;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post a message into a chatroom
    ///
    /// The sender must hold a membership row in the room; posting into a
    /// room one is not part of fails `NotAuthorized`. The timestamp is
    /// taken server-side at the moment of posting.
    #[instrument(skip(self, content))]
    pub async fn post(
        &self,
        chatroom_id: ChatroomId,
        sender_id: UserId,
        content: &str,
    ) -> RepoResult<Message> {
        if content.is_empty() {
            return Err(DomainError::EmptyMessage);
        }

        self.ctx
            .chatroom_repo()
            .find_by_id(chatroom_id)
            .await?
            .ok_or(DomainError::ChatroomNotFound(chatroom_id))?;

        if !self.ctx.member_repo().is_member(chatroom_id, sender_id).await? {
            warn!(chatroom_id = %chatroom_id, sender = %sender_id, "rejected: sender is not a member");
            return Err(DomainError::NotAuthorized(
                "only members may post to a chatroom".to_string(),
            ));
        }

        let message = self
            .ctx
            .message_repo()
            .create(chatroom_id, sender_id, content, Utc::now())
            .await?;

        info!(message_id = %message.id, chatroom_id = %chatroom_id, "message posted");
        Ok(message)
    }

    /// Load a message by id
    pub async fn load(&self, message_id: MessageId) -> RepoResult<Message> {
        self.ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))
    }

    /// All attachments carried by a message, id ascending
    pub async fn attachments(&self, message_id: MessageId) -> RepoResult<Vec<Attachment>> {
        self.load(message_id).await?;
        self.ctx.attachment_repo().for_message(message_id).await
    }

    /// Attach a file reference to an existing message
    #[instrument(skip(self, filepath))]
    pub async fn attach(&self, message_id: MessageId, filepath: &str) -> RepoResult<Attachment> {
        let attachment = self
            .ctx
            .attachment_repo()
            .create(message_id, filepath)
            .await?;
        info!(message_id = %message_id, attachment_id = %attachment.id, "attachment added");
        Ok(attachment)
    }

    /// Delete a message together with its attachments
    ///
    /// Returns how many attachments were removed alongside the row.
    #[instrument(skip(self))]
    pub async fn delete(&self, message_id: MessageId) -> RepoResult<u64> {
        let removed_attachments = self.ctx.message_repo().delete(message_id).await?;
        info!(message_id = %message_id, removed_attachments, "message deleted");
        Ok(removed_attachments)
    }
}
