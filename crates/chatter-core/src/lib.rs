//! # chatter-core
//!
//! Domain layer containing entities, value objects, repository traits, and
//! the domain error type. This crate has zero dependencies on
//! infrastructure (database, runtime, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Attachment, Chatroom, ChatroomMember, Message, User};
pub use error::DomainError;
pub use traits::{
    AttachmentRepository, ChatroomDeletion, ChatroomRepository, MemberRepository, MessageQuery,
    MessageRepository, RepoResult, UserDeletion, UserRepository,
};
pub use value_objects::{AttachmentId, ChatroomId, MessageId, UserId};
