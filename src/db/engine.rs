//! Database engine and connection management

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::sqlite::SqliteSynchronous;
use std::path::Path;
use std::time::Duration;

/// Database engine wrapper
#[derive(Debug, Clone)]
pub struct DbEngine {
    pool: SqlitePool,
}

impl DbEngine {
    /// Open (creating if missing) the SQLite database at `db_path` and create tables
    pub async fn open(db_path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database {}", db_path.display()))?;

        let engine = Self { pool };
        engine.create_tables().await?;

        Ok(engine)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn create_tables(&self) -> Result<()> {
        let pool = self.pool();

        // User table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                password TEXT NOT NULL,
                created_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_user_username ON user(username);
            "#,
        )
        .execute(pool)
        .await
        .context("Failed to create user table")?;

        // Session table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS session (
                token TEXT PRIMARY KEY,
                userid INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL,
                revoked INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (userid) REFERENCES user(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_session_userid ON session(userid);
            CREATE INDEX IF NOT EXISTS idx_session_expires_at ON session(expires_at);
            "#,
        )
        .execute(pool)
        .await
        .context("Failed to create session table")?;

        // Playlist table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS playlist (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                userid INTEGER NOT NULL,
                name TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                last_updated INTEGER NOT NULL,
                FOREIGN KEY (userid) REFERENCES user(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_playlist_userid ON playlist(userid);
            "#,
        )
        .execute(pool)
        .await
        .context("Failed to create playlist table")?;

        // Playlist membership, one row per (playlist, video)
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS playlist_video (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                playlist_id INTEGER NOT NULL,
                video_id TEXT NOT NULL,
                title TEXT NOT NULL,
                channel_title TEXT NOT NULL,
                view_count INTEGER NOT NULL DEFAULT 0,
                formatted_view_count TEXT NOT NULL,
                thumbnail TEXT,
                added_at INTEGER NOT NULL,
                UNIQUE (playlist_id, video_id),
                FOREIGN KEY (playlist_id) REFERENCES playlist(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_playlist_video_playlist ON playlist_video(playlist_id);
            "#,
        )
        .execute(pool)
        .await
        .context("Failed to create playlist_video table")?;

        // Like/dislike reactions
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS video_reaction (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                userid INTEGER NOT NULL,
                video_id TEXT NOT NULL,
                title TEXT NOT NULL,
                channel_title TEXT NOT NULL,
                thumbnail TEXT,
                reaction TEXT NOT NULL CHECK (reaction IN ('like', 'dislike')),
                UNIQUE (userid, video_id),
                FOREIGN KEY (userid) REFERENCES user(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_video_reaction_video ON video_reaction(video_id);
            "#,
        )
        .execute(pool)
        .await
        .context("Failed to create video_reaction table")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_creates_tables() {
        let temp_dir = TempDir::new().unwrap();
        let engine = DbEngine::open(&temp_dir.path().join("test.db")).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(engine.pool())
        .await
        .unwrap();
        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();

        assert_eq!(
            names,
            vec!["playlist", "playlist_video", "session", "user", "video_reaction"]
        );
    }

    #[tokio::test]
    async fn test_open_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.db");

        let first = DbEngine::open(&path).await.unwrap();
        first.close().await;
        assert!(DbEngine::open(&path).await.is_ok());
    }
}
