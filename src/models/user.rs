//! User model and the request/response shapes of the credential operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity as stored in the record store.
///
/// `refresh_token` is absent until the first successful login and is
/// rotated only by a password change, never by an ordinary login.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub group_id: i64,
    pub refresh_token: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub last_refresh_token_issued: Option<DateTime<Utc>>,
    pub last_access_token_issued: Option<DateTime<Utc>>,
    pub last_password_changed: Option<DateTime<Utc>>,
    pub registered_at: DateTime<Utc>,
}

/// Fields required to create a user record.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub group_id: i64,
}

/// Partial update applied to a user record by id.
///
/// `None` fields are left untouched by the store.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub password_hash: Option<String>,
    pub refresh_token: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub last_refresh_token_issued: Option<DateTime<Utc>>,
    pub last_access_token_issued: Option<DateTime<Utc>>,
    pub last_password_changed: Option<DateTime<Utc>>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.password_hash.is_none()
            && self.refresh_token.is_none()
            && self.last_login.is_none()
            && self.last_refresh_token_issued.is_none()
            && self.last_access_token_issued.is_none()
            && self.last_password_changed.is_none()
    }
}

/// Registration result (no sensitive fields).
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub group: String,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub id: i64,
    pub name: String,
    pub group: String,
    pub refresh_token: String,
    pub access_token: String,
}

/// Identity carried by a verified access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenIdentity {
    pub id: i64,
    pub name: String,
    pub group: String,
}
