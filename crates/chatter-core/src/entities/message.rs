//! Message and Attachment entities - the per-chatroom append-only log

use chrono::{DateTime, Utc};

use crate::value_objects::{AttachmentId, ChatroomId, MessageId, UserId};

/// Message entity
///
/// Messages are never edited after creation. Deleting a user does not touch
/// its messages beyond reassigning `sender_id` to the sentinel, so `content`,
/// `chatroom_id`, and `sent_at` are stable for the lifetime of the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub chatroom_id: ChatroomId,
    pub sender_id: UserId,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    /// Check whether the author has been deleted and the message reassigned
    /// to the sentinel
    #[inline]
    pub fn is_anonymized(&self) -> bool {
        self.sender_id.is_sentinel()
    }

    /// Get a truncated preview of the content
    pub fn preview(&self, max_chars: usize) -> String {
        if self.content.chars().count() <= max_chars {
            self.content.clone()
        } else {
            let truncated: String = self.content.chars().take(max_chars).collect();
            format!("{truncated}...")
        }
    }
}

/// Attachment entity - a file reference owned by exactly one message
///
/// `filepath` is an opaque pointer to externally stored content; the row's
/// lifecycle and the file's lifecycle are managed separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub id: AttachmentId,
    pub message_id: MessageId,
    pub filepath: String,
}

impl Attachment {
    /// Get the final path segment, for display purposes
    pub fn file_name(&self) -> &str {
        self.filepath
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.filepath)
    }
}
