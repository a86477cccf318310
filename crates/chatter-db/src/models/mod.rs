//! Database row models
//!
//! Thin `FromRow` structs matching the column aliases used by the
//! repository queries. Conversion into domain entities lives in
//! [`crate::mappers`].

pub mod attachment;
pub mod chatroom;
pub mod member;
pub mod message;
pub mod user;

pub use attachment::AttachmentModel;
pub use chatroom::ChatroomModel;
pub use member::MemberModel;
pub use message::MessageModel;
pub use user::UserModel;
