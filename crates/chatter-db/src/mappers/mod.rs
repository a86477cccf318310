//! Model to entity conversions
//!
//! `From` impls that lift database rows into `chatter-core` entities.
//! Kept separate from the models so the row structs stay plain data.

pub mod chatroom;
pub mod member;
pub mod message;
pub mod user;
