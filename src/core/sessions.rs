//! Session store
//!
//! Owns user registration, login and logout. Sessions are server-side rows
//! keyed by an opaque random token; the HTTP layer carries the token in a
//! cookie. Nothing here touches playlist data.

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::SESSION_TOKEN_LEN;
use crate::db::{DbEngine, SessionTable, UserTable};
use crate::error::{MuzeeError, Result};
use crate::models::{Session, User};
use crate::utils::auth::{generate_random_string, hash_password, verify_password};

/// Username/password pair as submitted by the client
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Trimmed username and password, rejecting empty values
    fn cleaned(&self) -> Result<(String, String)> {
        let username = self.username.trim();
        let password = self.password.trim();

        if username.is_empty() || password.is_empty() {
            return Err(MuzeeError::invalid(
                "Username and password are both required",
            ));
        }

        Ok((username.to_string(), password.to_string()))
    }
}

/// A freshly opened session and the user it is bound to
#[derive(Debug, Clone)]
pub struct Login {
    pub session: Session,
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    db: DbEngine,
    ttl: chrono::Duration,
}

impl SessionStore {
    pub fn new(db: DbEngine, ttl: chrono::Duration) -> Self {
        Self { db, ttl }
    }

    /// The user bound to `token`, if the session is active
    pub async fn current_identity(&self, token: Option<&str>) -> Result<Option<User>> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let pool = self.db.pool();
        let session = match SessionTable::get(pool, token).await? {
            Some(s) if s.is_active() => s,
            Some(_) => {
                debug!("Rejected expired or revoked session");
                return Ok(None);
            }
            None => return Ok(None),
        };

        UserTable::get_by_id(pool, session.user_id).await
    }

    /// Check credentials and open a session
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Login> {
        let (username, password) = credentials.cleaned()?;
        let pool = self.db.pool();

        let Some(user) = UserTable::get_by_username(pool, &username).await? else {
            return Err(MuzeeError::InvalidCredentials);
        };

        let stored = user.password.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .map_err(|e| anyhow::anyhow!("Password check task failed: {}", e))??;

        if !matches {
            return Err(MuzeeError::InvalidCredentials);
        }

        let session = self.new_session(user.id);
        SessionTable::insert(pool, &session).await?;

        info!(user_id = user.id, "User logged in");
        Ok(Login { session, user })
    }

    /// Create an account and open a session for it
    pub async fn register(&self, username: &str, password: &str) -> Result<Login> {
        let (username, password) = Credentials::new(username, password).cleaned()?;

        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Password hash task failed: {}", e))?;

        let mut tx = self.db.pool().begin().await?;

        let user = UserTable::insert(&mut *tx, &User::new(username, password_hash)).await?;
        let session = self.new_session(user.id);
        SessionTable::insert(&mut *tx, &session).await?;

        tx.commit().await?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(Login { session, user })
    }

    /// Revoke the session behind `token`; unknown or missing tokens are fine
    pub async fn end_session(&self, token: Option<&str>) -> Result<()> {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            if SessionTable::revoke(self.db.pool(), token).await? {
                debug!("Session revoked");
            }
        }
        Ok(())
    }

    /// Set a new password and revoke all of the user's sessions
    pub async fn reset_password(&self, username: &str, new_password: &str) -> Result<()> {
        let (username, password) = Credentials::new(username, new_password).cleaned()?;

        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Password hash task failed: {}", e))?;

        let mut tx = self.db.pool().begin().await?;

        let user = UserTable::get_by_username(&mut *tx, &username)
            .await?
            .ok_or_else(|| MuzeeError::not_found("User"))?;
        UserTable::update_password(&mut *tx, user.id, &password_hash).await?;
        let revoked = SessionTable::revoke_all_for_user(&mut *tx, user.id).await?;

        tx.commit().await?;

        info!(user_id = user.id, revoked, "Password reset");
        Ok(())
    }

    /// Drop expired and revoked sessions
    pub async fn purge_stale(&self) -> Result<u64> {
        let now = chrono::Utc::now().timestamp();
        SessionTable::delete_stale(self.db.pool(), now).await
    }

    fn new_session(&self, user_id: i64) -> Session {
        Session::new(generate_random_string(SESSION_TOKEN_LEN), user_id, self.ttl)
    }
}
