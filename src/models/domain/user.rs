use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored account. `password_hash` is a bcrypt hash and never leaves the
/// server; responses go through `UserDto`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(username: &str, password_hash: &str, is_admin: bool) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_admin,
            created_at: Some(Utc::now()),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl User {
    pub fn test_user(username: &str) -> Self {
        User::new(username, "not-a-real-hash", false)
    }

    pub fn test_admin(username: &str) -> Self {
        User::new(username, "not-a-real-hash", true)
    }
}
