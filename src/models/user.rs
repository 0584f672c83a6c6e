//! User model

use serde::{Deserialize, Serialize};

use super::UserId;

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Database ID
    pub id: UserId,
    /// Username, unique and case-sensitive
    pub username: String,
    /// Password hash (not serialized to JSON)
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Unix timestamp of registration
    #[serde(default)]
    pub created_at: i64,
}

impl User {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: 0,
            username,
            password: password_hash,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}
