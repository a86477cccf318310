//! Domain entities - core business objects

mod chatroom;
mod member;
mod message;
mod user;

pub use chatroom::Chatroom;
pub use member::ChatroomMember;
pub use message::{Attachment, Message};
pub use user::User;
