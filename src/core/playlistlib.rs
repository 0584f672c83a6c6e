//! Playlist repository
//!
//! Owns playlists and their video membership. Every operation takes the
//! caller's resolved identity and enforces ownership here, at the data layer.
//!
//! Writes to one playlist are serialized twice: in-process by a per-playlist
//! async mutex, and in SQLite by starting each write transaction with
//! [`PlaylistTable::touch`]. The `UNIQUE(playlist_id, video_id)` constraint is
//! the last line for duplicate entries. Dropping an uncommitted transaction
//! rolls it back, so an abandoned request leaves nothing behind.
//!
//! A lock entry lives only while some request holds or waits on it.

use std::sync::Arc;

use dashmap::DashMap;
use sqlx::{Sqlite, Transaction};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::db::tables::is_unique_violation;
use crate::db::{DbEngine, PlaylistRow, PlaylistTable};
use crate::error::{MuzeeError, Result};
use crate::models::{Playlist, PlaylistId, PlaylistSummary, User, VideoRecord};

type PlaylistLocks = DashMap<PlaylistId, Arc<Mutex<()>>>;

#[derive(Debug, Clone)]
pub struct PlaylistRepository {
    db: DbEngine,
    locks: Arc<PlaylistLocks>,
}

impl PlaylistRepository {
    pub fn new(db: DbEngine) -> Self {
        Self {
            db,
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Playlist summaries for `owner`, newest first
    pub async fn list_playlists(&self, owner: &User) -> Result<Vec<PlaylistSummary>> {
        PlaylistTable::summaries_for_user(self.db.pool(), owner.id).await
    }

    /// Create an empty playlist; the name is trimmed and must not be empty
    pub async fn create_playlist(&self, owner: &User, name: &str) -> Result<Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MuzeeError::invalid("Playlist name cannot be empty"));
        }

        let created_at = chrono::Utc::now().timestamp();
        let id = PlaylistTable::insert(self.db.pool(), owner.id, name, created_at).await?;

        info!(user_id = owner.id, playlist_id = id, "Playlist created");

        Ok(Playlist {
            id,
            owner: owner.id,
            name: name.to_string(),
            created_at,
            videos: Vec::new(),
        })
    }

    /// Full playlist with entries in insertion order
    pub async fn get_playlist(&self, owner: &User, id: PlaylistId) -> Result<Playlist> {
        let mut tx = self.db.pool().begin().await?;

        let row = owned_by(PlaylistTable::get_by_id(&mut *tx, id).await?, owner)?;
        let playlist = load(&mut tx, row).await?;

        tx.commit().await?;
        Ok(playlist)
    }

    /// Delete a playlist together with all of its entries, returning its name
    pub async fn delete_playlist(&self, owner: &User, id: PlaylistId) -> Result<String> {
        let slot = self.slot(id);
        let _guard = slot.lock().await;

        let mut tx = self.begin_write(id).await?;
        let row = owned_by(PlaylistTable::get_by_id(&mut *tx, id).await?, owner)?;

        let removed = PlaylistTable::clear_videos(&mut *tx, id).await?;
        PlaylistTable::delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!(
            user_id = owner.id,
            playlist_id = id,
            entries = removed,
            "Playlist deleted"
        );
        Ok(row.name)
    }

    /// Append a video; an id already present is rejected with `DuplicateVideo`
    pub async fn add_video(
        &self,
        owner: &User,
        id: PlaylistId,
        video: &VideoRecord,
    ) -> Result<Playlist> {
        let slot = self.slot(id);
        let _guard = slot.lock().await;

        let mut tx = self.begin_write(id).await?;
        let row = owned_by(PlaylistTable::get_by_id(&mut *tx, id).await?, owner)?;

        if PlaylistTable::has_video(&mut *tx, id, &video.id).await? {
            return Err(MuzeeError::DuplicateVideo);
        }

        let added_at = chrono::Utc::now().timestamp();
        PlaylistTable::insert_video(&mut *tx, id, video, added_at)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    MuzeeError::DuplicateVideo
                } else {
                    MuzeeError::Database(e)
                }
            })?;

        let playlist = load(&mut tx, row).await?;
        tx.commit().await?;

        debug!(playlist_id = id, video_id = %video.id, "Video added");
        Ok(playlist)
    }

    /// Remove a video entry by platform video id
    ///
    /// The id is trimmed the same way the result adapter trims it on add.
    pub async fn remove_video(
        &self,
        owner: &User,
        id: PlaylistId,
        video_id: &str,
    ) -> Result<Playlist> {
        let video_id = video_id.trim();
        let slot = self.slot(id);
        let _guard = slot.lock().await;

        let mut tx = self.begin_write(id).await?;
        let row = owned_by(PlaylistTable::get_by_id(&mut *tx, id).await?, owner)?;

        if PlaylistTable::remove_video(&mut *tx, id, video_id).await? == 0 {
            return Err(MuzeeError::VideoNotInPlaylist);
        }

        let playlist = load(&mut tx, row).await?;
        tx.commit().await?;

        debug!(playlist_id = id, video_id, "Video removed");
        Ok(playlist)
    }

    fn slot(&self, id: PlaylistId) -> LockSlot {
        let mutex = self.locks.entry(id).or_default().clone();
        LockSlot {
            locks: self.locks.clone(),
            id,
            mutex,
        }
    }

    /// Open a write transaction on an existing playlist
    async fn begin_write(&self, id: PlaylistId) -> Result<Transaction<'static, Sqlite>> {
        let mut tx = self.db.pool().begin().await?;

        let now = chrono::Utc::now().timestamp();
        if !PlaylistTable::touch(&mut *tx, id, now).await? {
            return Err(MuzeeError::not_found("Playlist"));
        }

        Ok(tx)
    }
}

/// One request's claim on a playlist's write lock
///
/// Dropping the last claim removes the map entry, including when the
/// request is abandoned while still waiting.
struct LockSlot {
    locks: Arc<PlaylistLocks>,
    id: PlaylistId,
    mutex: Arc<Mutex<()>>,
}

impl LockSlot {
    async fn lock(&self) -> MutexGuard<'_, ()> {
        self.mutex.lock().await
    }
}

impl Drop for LockSlot {
    fn drop(&mut self) {
        // the map and this slot are the only holders
        self.locks
            .remove_if(&self.id, |_, mutex| Arc::strong_count(mutex) == 2);
    }
}

/// Ownership check; a playlist that exists under another user is `Forbidden`
fn owned_by(row: Option<PlaylistRow>, owner: &User) -> Result<PlaylistRow> {
    match row {
        None => Err(MuzeeError::not_found("Playlist")),
        Some(row) if row.userid != owner.id => Err(MuzeeError::Forbidden),
        Some(row) => Ok(row),
    }
}

async fn load(tx: &mut Transaction<'static, Sqlite>, row: PlaylistRow) -> Result<Playlist> {
    let videos = PlaylistTable::videos(&mut **tx, row.id).await?;

    Ok(Playlist {
        id: row.id,
        owner: row.userid,
        name: row.name,
        created_at: row.created_at,
        videos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::UserTable;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Fixture {
        repo: PlaylistRepository,
        db: DbEngine,
        _dir: TempDir,
    }

    async fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let db = DbEngine::open(&dir.path().join("test.db")).await.unwrap();
        Fixture {
            repo: PlaylistRepository::new(db.clone()),
            db,
            _dir: dir,
        }
    }

    async fn user(db: &DbEngine, name: &str) -> User {
        UserTable::insert(db.pool(), &User::new(name.to_string(), "x".to_string()))
            .await
            .unwrap()
    }

    fn song(id: &str) -> VideoRecord {
        VideoRecord {
            id: id.to_string(),
            title: format!("Song {}", id),
            channel_title: "Artist A".to_string(),
            view_count: 1000,
            formatted_view_count: "1,000".to_string(),
            thumbnail: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_empty() {
        let f = fixture().await;
        let alice = user(&f.db, "alice").await;

        let created = f.repo.create_playlist(&alice, "  My Mix ").await.unwrap();
        assert_eq!(created.name, "My Mix");

        let fetched = f.repo.get_playlist(&alice, created.id).await.unwrap();
        assert_eq!(fetched.name, "My Mix");
        assert!(fetched.videos.is_empty());
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let f = fixture().await;
        let alice = user(&f.db, "alice").await;

        assert!(matches!(
            f.repo.create_playlist(&alice, " \t ").await,
            Err(MuzeeError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_allows_duplicate_names() {
        let f = fixture().await;
        let alice = user(&f.db, "alice").await;

        let first = f.repo.create_playlist(&alice, "Chill").await.unwrap();
        let second = f.repo.create_playlist(&alice, "Chill").await.unwrap();
        f.repo.add_video(&alice, first.id, &song("a")).await.unwrap();

        let list = f.repo.list_playlists(&alice).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, second.id);
        assert_eq!(list[1].count, 1);
    }

    #[tokio::test]
    async fn test_other_users_cannot_see_or_touch() {
        let f = fixture().await;
        let alice = user(&f.db, "alice").await;
        let bob = user(&f.db, "bob").await;

        let p = f.repo.create_playlist(&alice, "Mine").await.unwrap();

        assert!(f.repo.list_playlists(&bob).await.unwrap().is_empty());
        assert!(matches!(
            f.repo.get_playlist(&bob, p.id).await,
            Err(MuzeeError::Forbidden)
        ));
        assert!(matches!(
            f.repo.add_video(&bob, p.id, &song("a")).await,
            Err(MuzeeError::Forbidden)
        ));
        assert!(matches!(
            f.repo.delete_playlist(&bob, p.id).await,
            Err(MuzeeError::Forbidden)
        ));

        // nothing leaked through the rolled back transactions
        let still = f.repo.get_playlist(&alice, p.id).await.unwrap();
        assert!(still.videos.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_video_rejected() {
        let f = fixture().await;
        let alice = user(&f.db, "alice").await;
        let p = f.repo.create_playlist(&alice, "Chill").await.unwrap();

        f.repo.add_video(&alice, p.id, &song("abc123")).await.unwrap();
        assert!(matches!(
            f.repo.add_video(&alice, p.id, &song("abc123")).await,
            Err(MuzeeError::DuplicateVideo)
        ));

        let fetched = f.repo.get_playlist(&alice, p.id).await.unwrap();
        assert_eq!(fetched.count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_keep_one_entry() {
        let f = fixture().await;
        let alice = user(&f.db, "alice").await;
        let id = f.repo.create_playlist(&alice, "Race").await.unwrap().id;

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let repo = f.repo.clone();
                let alice = alice.clone();
                tokio::spawn(async move { repo.add_video(&alice, id, &song("same")).await })
            })
            .collect();

        let results = futures::future::join_all(tasks).await;
        let ok = results
            .into_iter()
            .map(|r| r.unwrap())
            .filter(|r| r.is_ok())
            .count();
        assert_eq!(ok, 1);

        let fetched = f.repo.get_playlist(&alice, id).await.unwrap();
        assert_eq!(fetched.count(), 1);
    }

    #[tokio::test]
    async fn test_entries_keep_insertion_order() {
        let f = fixture().await;
        let alice = user(&f.db, "alice").await;
        let p = f.repo.create_playlist(&alice, "Order").await.unwrap();

        for id in ["c", "a", "b"] {
            f.repo.add_video(&alice, p.id, &song(id)).await.unwrap();
        }

        let ids: Vec<_> = f
            .repo
            .get_playlist(&alice, p.id)
            .await
            .unwrap()
            .videos
            .into_iter()
            .map(|v| v.video.id)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_remove_video() {
        let f = fixture().await;
        let alice = user(&f.db, "alice").await;
        let p = f.repo.create_playlist(&alice, "Chill").await.unwrap();
        f.repo.add_video(&alice, p.id, &song("abc123")).await.unwrap();

        let updated = f.repo.remove_video(&alice, p.id, "abc123").await.unwrap();
        assert!(updated.videos.is_empty());

        assert!(matches!(
            f.repo.remove_video(&alice, p.id, "abc123").await,
            Err(MuzeeError::VideoNotInPlaylist)
        ));
    }

    #[tokio::test]
    async fn test_remove_trims_video_id() {
        let f = fixture().await;
        let alice = user(&f.db, "alice").await;
        let p = f.repo.create_playlist(&alice, "Chill").await.unwrap();
        f.repo.add_video(&alice, p.id, &song("abc")).await.unwrap();

        let updated = f.repo.remove_video(&alice, p.id, "  abc ").await.unwrap();
        assert!(updated.videos.is_empty());
    }

    #[tokio::test]
    async fn test_lock_entries_do_not_outlive_requests() {
        let f = fixture().await;
        let alice = user(&f.db, "alice").await;
        let bob = user(&f.db, "bob").await;
        let p = f.repo.create_playlist(&alice, "Mine").await.unwrap();

        for missing in 1000..1200 {
            assert!(matches!(
                f.repo.add_video(&alice, missing, &song("a")).await,
                Err(MuzeeError::NotFound(_))
            ));
        }
        assert!(f.repo.remove_video(&bob, p.id, "a").await.is_err());
        assert!(f.repo.delete_playlist(&bob, p.id).await.is_err());
        assert!(f.repo.locks.is_empty());

        f.repo.add_video(&alice, p.id, &song("a")).await.unwrap();
        assert!(f.repo.add_video(&alice, p.id, &song("a")).await.is_err());
        f.repo.remove_video(&alice, p.id, "a").await.unwrap();
        assert!(f.repo.locks.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_abandoned_writes_apply_fully_or_not_at_all() {
        let f = fixture().await;
        let alice = user(&f.db, "alice").await;

        for step in 0..24u64 {
            let p = f.repo.create_playlist(&alice, "Half").await.unwrap();
            f.repo.add_video(&alice, p.id, &song("a")).await.unwrap();
            f.repo.add_video(&alice, p.id, &song("b")).await.unwrap();

            // cut each request off at a different point
            let budget = Duration::from_micros(step * 250);
            let _ = tokio::time::timeout(budget, f.repo.add_video(&alice, p.id, &song("c"))).await;
            let _ = tokio::time::timeout(budget, f.repo.delete_playlist(&alice, p.id)).await;

            match f.repo.get_playlist(&alice, p.id).await {
                Ok(playlist) => {
                    let ids: Vec<_> = playlist.videos.iter().map(|v| v.video.id.as_str()).collect();
                    assert!(ids == ["a", "b"] || ids == ["a", "b", "c"], "got {:?}", ids);
                }
                Err(MuzeeError::NotFound(_)) => {
                    assert_eq!(PlaylistTable::count_videos(f.db.pool(), p.id).await.unwrap(), 0);
                }
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert!(f.repo.locks.is_empty());
    }

    #[tokio::test]
    async fn test_delete_twice_and_cascade() {
        let f = fixture().await;
        let alice = user(&f.db, "alice").await;
        let p = f.repo.create_playlist(&alice, "Gone").await.unwrap();
        f.repo.add_video(&alice, p.id, &song("a")).await.unwrap();

        assert_eq!(f.repo.delete_playlist(&alice, p.id).await.unwrap(), "Gone");
        assert!(matches!(
            f.repo.delete_playlist(&alice, p.id).await,
            Err(MuzeeError::NotFound(_))
        ));
        assert!(matches!(
            f.repo.get_playlist(&alice, p.id).await,
            Err(MuzeeError::NotFound(_))
        ));
        assert_eq!(PlaylistTable::count_videos(f.db.pool(), p.id).await.unwrap(), 0);
    }
}
