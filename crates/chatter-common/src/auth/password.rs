//! Password hashing and verification using Argon2
//!
//! Credentials are stored only as salted one-way hashes. Nothing in this
//! module (or anywhere else) keeps the raw secret in recoverable form.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chatter_core::DomainError;

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Hash a password with Argon2 and a freshly generated salt
pub fn hash_password(password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DomainError::InternalError(format!("failed to hash password: {e}")))
}

/// Verify a presented password against a stored hash
///
/// A stored value that is not a parseable hash never verifies; in
/// particular the sentinel row's empty credential field makes that account
/// structurally unauthenticatable.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Enforce the minimum password length, counted in characters
pub fn validate_password_length(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(DomainError::WeakPassword);
    }
    Ok(())
}
