//! Authentication service.
//!
//! Provides password registration and login for shoppers. Passwords are
//! hashed with Argon2id; the session layer on top of this service decides
//! what a successful login means for the caller's cookie.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use marigold_core::Email;

use crate::models::{NewUser, User};
use crate::store::{Store, StoreError};

/// Minimum display-name length.
const MIN_NAME_LENGTH: usize = 2;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles user registration and password login against the store.
pub struct AuthService<'a> {
    store: &'a dyn Store,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new user with name, email, and password.
    ///
    /// Fields are validated in order; the first violation wins.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidName`, `AuthError::InvalidEmail`, or
    /// `AuthError::WeakPassword` if a field fails validation.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        // Validate fields in schema order
        validate_name(name)?;
        let email = Email::parse(email)
            .map_err(|_| AuthError::InvalidEmail("Please provide a valid email address"))?;
        validate_password(password)?;

        // Check if user already exists
        if self.store.user_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        // Hash password
        let password_hash = hash_password(password)?;

        // Create user; the store's unique constraint backstops the
        // existence check above under concurrent registration
        let user = self
            .store
            .create_user(NewUser {
                name: name.to_owned(),
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Store(other),
            })?;

        Ok(user)
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .store
            .user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Validate the display name meets requirements.
///
/// Counted in characters, not bytes, so a two-letter accented name passes.
fn validate_name(name: &str) -> Result<(), AuthError> {
    if name.chars().count() < MIN_NAME_LENGTH {
        return Err(AuthError::InvalidName(
            "Name must be at least 2 characters long",
        ));
    }

    Ok(())
}

/// Validate the password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(
            "Password must be at least 8 characters long",
        ));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
