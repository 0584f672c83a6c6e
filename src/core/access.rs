//! Playlist access service
//!
//! The request-facing layer over [`PlaylistRepository`]. Resolves the caller
//! from their session token, refuses anonymous callers, and reports a playlist
//! owned by someone else exactly like a missing one.

use serde_json::Value;
use tracing::debug;

use super::normalize::normalize;
use super::playlistlib::PlaylistRepository;
use super::sessions::SessionStore;
use crate::error::{MuzeeError, Result};
use crate::models::{Playlist, PlaylistId, PlaylistSummary, User};

#[derive(Debug, Clone)]
pub struct PlaylistService {
    sessions: SessionStore,
    playlists: PlaylistRepository,
}

impl PlaylistService {
    pub fn new(sessions: SessionStore, playlists: PlaylistRepository) -> Self {
        Self {
            sessions,
            playlists,
        }
    }

    /// The user behind `token`, or `Unauthenticated`
    pub async fn caller(&self, token: Option<&str>) -> Result<User> {
        self.sessions
            .current_identity(token)
            .await?
            .ok_or(MuzeeError::Unauthenticated)
    }

    pub async fn list(&self, token: Option<&str>) -> Result<Vec<PlaylistSummary>> {
        let user = self.caller(token).await?;
        self.playlists.list_playlists(&user).await
    }

    pub async fn create(&self, token: Option<&str>, name: &str) -> Result<Playlist> {
        let user = self.caller(token).await?;
        self.playlists.create_playlist(&user, name).await
    }

    pub async fn get(&self, token: Option<&str>, id: PlaylistId) -> Result<Playlist> {
        let user = self.caller(token).await?;
        conceal(self.playlists.get_playlist(&user, id).await)
    }

    /// Delete a playlist, returning its name
    pub async fn delete(&self, token: Option<&str>, id: PlaylistId) -> Result<String> {
        let user = self.caller(token).await?;
        conceal(self.playlists.delete_playlist(&user, id).await)
    }

    /// Add a raw recommendation result to a playlist
    ///
    /// The payload goes through the result adapter, so any accepted search
    /// result shape can be added as-is.
    pub async fn add_video(
        &self,
        token: Option<&str>,
        id: PlaylistId,
        raw: Option<&Value>,
    ) -> Result<Playlist> {
        let user = self.caller(token).await?;

        let raw = raw
            .filter(|v| !v.is_null())
            .ok_or_else(|| MuzeeError::invalid("Video information is required"))?;
        let video = normalize(raw).map_err(|e| match e {
            MuzeeError::MalformedResult(msg) => {
                MuzeeError::invalid(format!("Invalid video payload: {}", msg))
            }
            other => other,
        })?;

        conceal(self.playlists.add_video(&user, id, &video).await)
    }

    pub async fn remove_video(
        &self,
        token: Option<&str>,
        id: PlaylistId,
        video_id: &str,
    ) -> Result<Playlist> {
        let user = self.caller(token).await?;
        conceal(self.playlists.remove_video(&user, id, video_id).await)
    }
}

/// Parse a playlist id from a path segment; garbage ids cannot exist
pub fn parse_playlist_id(raw: &str) -> Result<PlaylistId> {
    raw.trim()
        .parse::<PlaylistId>()
        .map_err(|_| MuzeeError::not_found("Playlist"))
}

/// Report another user's playlist as missing
fn conceal<T>(result: Result<T>) -> Result<T> {
    result.map_err(|e| match e {
        MuzeeError::Forbidden => {
            debug!("Denied access to a playlist owned by another user");
            MuzeeError::not_found("Playlist")
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbEngine;
    use serde_json::json;
    use tempfile::TempDir;

    async fn service() -> (PlaylistService, SessionStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let db = DbEngine::open(&dir.path().join("test.db")).await.unwrap();
        let sessions = SessionStore::new(db.clone(), chrono::Duration::hours(1));
        let service = PlaylistService::new(sessions.clone(), PlaylistRepository::new(db));
        (service, sessions, dir)
    }

    #[tokio::test]
    async fn test_anonymous_caller_rejected() {
        let (service, _, _dir) = service().await;

        assert!(matches!(
            service.create(None, "Chill").await,
            Err(MuzeeError::Unauthenticated)
        ));
        assert!(matches!(
            service.list(Some("bogus-token")).await,
            Err(MuzeeError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_foreign_playlist_looks_missing() {
        let (service, sessions, _dir) = service().await;
        let alice = sessions.register("alice", "pw").await.unwrap().session.token;
        let bob = sessions.register("bob", "pw").await.unwrap().session.token;

        let p = service.create(Some(&alice), "Private").await.unwrap();

        let err = service.get(Some(&bob), p.id).await.unwrap_err();
        assert!(matches!(err, MuzeeError::NotFound(_)));
        let missing = service.get(Some(&bob), p.id + 100).await.unwrap_err();
        assert_eq!(err.to_string(), missing.to_string());
    }

    #[tokio::test]
    async fn test_add_video_normalizes_payload() {
        let (service, sessions, _dir) = service().await;
        let token = sessions.register("alice", "pw").await.unwrap().session.token;
        let p = service.create(Some(&token), "Chill").await.unwrap();

        let raw = json!({
            "id": { "videoId": "xyz" },
            "snippet": { "title": "Search Hit", "channelTitle": "Band" }
        });
        let updated = service.add_video(Some(&token), p.id, Some(&raw)).await.unwrap();
        assert_eq!(updated.videos[0].video.formatted_view_count, "N/A");

        assert!(matches!(
            service
                .add_video(Some(&token), p.id, Some(&json!({ "title": "no id" })))
                .await,
            Err(MuzeeError::InvalidInput(_))
        ));
        assert!(matches!(
            service.add_video(Some(&token), p.id, None).await,
            Err(MuzeeError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_padded_video_id_can_be_removed() {
        let (service, sessions, _dir) = service().await;
        let token = sessions.register("alice", "pw").await.unwrap().session.token;
        let p = service.create(Some(&token), "Chill").await.unwrap();

        let raw = json!({ "id": " abc ", "title": "t" });
        let added = service.add_video(Some(&token), p.id, Some(&raw)).await.unwrap();
        assert_eq!(added.videos[0].video.id, "abc");

        let removed = service
            .remove_video(Some(&token), p.id, " abc ")
            .await
            .unwrap();
        assert!(removed.videos.is_empty());
    }

    #[tokio::test]
    async fn test_delete_returns_name_and_hides_foreign() {
        let (service, sessions, _dir) = service().await;
        let alice = sessions.register("alice", "pw").await.unwrap().session.token;
        let bob = sessions.register("bob", "pw").await.unwrap().session.token;
        let p = service.create(Some(&alice), "Road Trip").await.unwrap();

        assert!(matches!(
            service.delete(Some(&bob), p.id).await,
            Err(MuzeeError::NotFound(_))
        ));
        assert_eq!(service.delete(Some(&alice), p.id).await.unwrap(), "Road Trip");
        assert!(matches!(
            service.get(Some(&alice), p.id).await,
            Err(MuzeeError::NotFound(_))
        ));
    }

    #[test]
    fn test_parse_playlist_id() {
        assert_eq!(parse_playlist_id("42").unwrap(), 42);
        assert!(matches!(
            parse_playlist_id("abc"),
            Err(MuzeeError::NotFound(_))
        ));
    }
}
