//! # chatter-service
//!
//! Application layer containing the business logic services: registration
//! and authentication, chatroom and membership management, posting, and
//! the account deletion orchestration entry point.

pub mod services;

pub use services::{
    AttachmentService, ChatroomService, MessageService, ServiceContext, UserService,
};
