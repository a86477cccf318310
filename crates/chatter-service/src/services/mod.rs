//! Business logic services
//!
//! This module contains the service layer implementations that handle
//! validation, authorization, and orchestration of domain operations.

pub mod attachment;
pub mod chatroom;
pub mod context;
pub mod message;
pub mod user;

// Re-export all services for convenience
pub use attachment::AttachmentService;
pub use chatroom::ChatroomService;
pub use context::ServiceContext;
pub use message::MessageService;
pub use user::UserService;
