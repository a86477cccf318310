//! # chatter-common
//!
//! Shared utilities: configuration, credential hashing, and telemetry.

pub mod auth;
pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{hash_password, validate_password_length, verify_password, MIN_PASSWORD_CHARS};
pub use config::{AppConfig, AppSettings, ConfigError, DatabaseConfig, Environment};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
