//! Trait definitions - contracts between the domain and infrastructure

mod repositories;

pub use repositories::{
    AttachmentRepository, ChatroomDeletion, ChatroomRepository, MemberRepository, MessageQuery,
    MessageRepository, RepoResult, UserDeletion, UserRepository,
};
