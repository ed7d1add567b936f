//! Authentication error types.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during authentication operations.
///
/// The validation variants carry the exact message shown to the client.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Name failed validation.
    #[error("invalid name: {0}")]
    InvalidName(&'static str),

    /// Email failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(&'static str),

    /// Password doesn't meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(&'static str),

    /// Email already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("failed to hash password")]
    PasswordHash,

    /// Store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
