//! Repository implementations
//!
//! SQLite implementations of the `chatter-core` repository traits. Each
//! struct is a cheap clone around the shared pool; operations that touch
//! multiple rows open their own transaction.

mod error;

pub mod attachment;
pub mod chatroom;
pub mod member;
pub mod message;
pub mod user;

pub use attachment::SqliteAttachmentRepository;
pub use chatroom::SqliteChatroomRepository;
pub use member::SqliteMemberRepository;
pub use message::SqliteMessageRepository;
pub use user::SqliteUserRepository;
