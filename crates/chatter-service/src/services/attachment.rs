//! Attachment service
//!
//! Row-level attachment management. The referenced file content lives
//! outside this system and is never touched here.

use chatter_core::{Attachment, AttachmentId, DomainError, MessageId, RepoResult};
use tracing::{info, instrument};

use super::context::ServiceContext;

/// Attachment service
pub struct AttachmentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AttachmentService<'a> {
    /// Create a new AttachmentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an attachment referencing an existing message
    ///
    /// `filepath` is stored opaquely; nothing checks that it points
    /// anywhere.
    #[instrument(skip(self, filepath))]
    pub async fn create(&self, message_id: MessageId, filepath: &str) -> RepoResult<Attachment> {
        let attachment = self
            .ctx
            .attachment_repo()
            .create(message_id, filepath)
            .await?;
        info!(attachment_id = %attachment.id, message_id = %message_id, "attachment created");
        Ok(attachment)
    }

    /// Load an attachment by id
    pub async fn load(&self, attachment_id: AttachmentId) -> RepoResult<Attachment> {
        self.ctx
            .attachment_repo()
            .find_by_id(attachment_id)
            .await?
            .ok_or(DomainError::AttachmentNotFound(attachment_id))
    }

    /// All attachments for a message, id ascending
    pub async fn for_message(&self, message_id: MessageId) -> RepoResult<Vec<Attachment>> {
        self.ctx.attachment_repo().for_message(message_id).await
    }

    /// Remove the attachment row
    #[instrument(skip(self))]
    pub async fn delete(&self, attachment_id: AttachmentId) -> RepoResult<()> {
        self.ctx.attachment_repo().delete(attachment_id).await?;
        info!(attachment_id = %attachment_id, "attachment deleted");
        Ok(())
    }
}
