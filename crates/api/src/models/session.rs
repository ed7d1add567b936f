//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use marigold_core::{UserId, UserRole};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user. The
/// role is included so authorization checks never need a user lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// Authorization role at login time.
    pub role: UserRole,
}

/// Authenticated caller identity handed to every workflow call.
///
/// Built by the `RequireAuth` extractor from the session; nothing below the
/// extractor reads ambient auth state.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub user_id: UserId,
    pub role: UserRole,
}

impl From<CurrentUser> for AuthContext {
    fn from(user: CurrentUser) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
        }
    }
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
