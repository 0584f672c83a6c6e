//! Login session model

use serde::{Deserialize, Serialize};

use super::UserId;

/// Server-held binding from an opaque token to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    /// Unix timestamps
    pub created_at: i64,
    pub expires_at: i64,
    #[serde(default)]
    pub revoked: bool,
}

impl Session {
    pub fn new(token: String, user_id: UserId, ttl: chrono::Duration) -> Self {
        let now = chrono::Utc::now();
        Self {
            token,
            user_id,
            created_at: now.timestamp(),
            expires_at: (now + ttl).timestamp(),
            revoked: false,
        }
    }

    /// Whether the session still binds its user at `now` (unix seconds)
    pub fn is_active_at(&self, now: i64) -> bool {
        !self.revoked && self.expires_at > now
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(chrono::Utc::now().timestamp())
    }

    /// Seconds left before expiry, zero once expired
    pub fn remaining_secs(&self) -> i64 {
        (self.expires_at - chrono::Utc::now().timestamp()).max(0)
    }
}
