//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;

use muzee::config::UserConfig;
use muzee::core::VideoSource;
use muzee::db::DbEngine;
use muzee::AppState;

/// App state over a fresh SQLite file that lives as long as this value
pub struct TestEnv {
    pub state: AppState,
    _temp_dir: TempDir,
}

impl TestEnv {
    /// Default config: no API key, so recommendations come from the catalog
    pub async fn new() -> Self {
        Self::build(|db, config| AppState::new(db, config)).await
    }

    pub async fn with_source(source: Arc<dyn VideoSource>) -> Self {
        Self::build(move |db, config| AppState::with_source(db, config, source)).await
    }

    async fn build(make: impl FnOnce(DbEngine, UserConfig) -> AppState) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db = DbEngine::open(&temp_dir.path().join("muzee.db"))
            .await
            .expect("Failed to open test database");

        Self {
            state: make(db, UserConfig::default()),
            _temp_dir: temp_dir,
        }
    }

    /// Register a user directly and return their session token
    pub async fn token_for(&self, username: &str) -> String {
        self.state
            .sessions
            .register(username, "pw123")
            .await
            .expect("Failed to register test user")
            .session
            .token
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
