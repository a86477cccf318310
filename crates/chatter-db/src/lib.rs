//! # chatter-db
//!
//! Database layer for the chat persistence stack.
//!
//! Provides SQLite-backed implementations of the `chatter-core` repository
//! traits, connection pool management, and destructive schema bootstrap.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chatter_common::DatabaseConfig;
//! use chatter_core::UserRepository;
//! use chatter_db::{create_pool, init_schema, SqliteUserRepository};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! init_schema(&pool).await?;
//!
//! let users = SqliteUserRepository::new(pool.clone());
//! let alice = users.create("alice", &password_hash).await?;
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

pub use pool::{connect, create_pool, SqlitePool};
pub use repositories::{
    SqliteAttachmentRepository, SqliteChatroomRepository, SqliteMemberRepository,
    SqliteMessageRepository, SqliteUserRepository,
};
pub use schema::init_schema;
