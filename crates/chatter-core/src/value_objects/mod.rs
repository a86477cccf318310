//! Value objects - immutable domain primitives

mod id;

pub use id::{AttachmentId, ChatroomId, MessageId, UserId};
