//! Credential handling

mod password;

pub use password::{hash_password, validate_password_length, verify_password, MIN_PASSWORD_CHARS};
