//! User model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use marigold_core::{Email, UserId, UserRole};

/// A registered shopper or staff member.
///
/// The password hash is deliberately not part of this struct so that a `User`
/// can be serialized into API responses as-is. The store hands the hash back
/// separately where login needs it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a user. Role is always `USER` at registration.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
}
