//! Playlist and playlist_video table operations

use sqlx::{Executor, FromRow, Sqlite};

use crate::error::Result;
use crate::models::{PlaylistId, PlaylistSummary, UserId, VideoEntry, VideoRecord};

/// Database row for playlist table
#[derive(Debug, Clone, FromRow)]
pub struct PlaylistRow {
    pub id: i64,
    pub userid: i64,
    pub name: String,
    pub created_at: i64,
}

#[derive(Debug, FromRow)]
struct SummaryRow {
    id: i64,
    name: String,
    video_count: i64,
}

/// Database row for playlist_video table
#[derive(Debug, FromRow)]
struct VideoRow {
    video_id: String,
    title: String,
    channel_title: String,
    view_count: i64,
    formatted_view_count: String,
    thumbnail: Option<String>,
    added_at: i64,
}

impl VideoRow {
    fn into_entry(self) -> VideoEntry {
        VideoEntry {
            video: VideoRecord {
                id: self.video_id,
                title: self.title,
                channel_title: self.channel_title,
                view_count: self.view_count,
                formatted_view_count: self.formatted_view_count,
                thumbnail: self.thumbnail,
            },
            added_at: self.added_at,
        }
    }
}

/// Playlist table operations
pub struct PlaylistTable;

impl PlaylistTable {
    /// A user's playlists with entry counts, newest first
    pub async fn summaries_for_user<'e, E>(exec: E, userid: UserId) -> Result<Vec<PlaylistSummary>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows: Vec<SummaryRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.name, COUNT(pv.id) AS video_count
            FROM playlist p
            LEFT JOIN playlist_video pv ON p.id = pv.playlist_id
            WHERE p.userid = ?
            GROUP BY p.id
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .bind(userid)
        .fetch_all(exec)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| PlaylistSummary {
                id: r.id,
                name: r.name,
                count: r.video_count,
            })
            .collect())
    }

    /// Get playlist row by ID regardless of owner
    pub async fn get_by_id<'e, E>(exec: E, id: PlaylistId) -> Result<Option<PlaylistRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: Option<PlaylistRow> =
            sqlx::query_as("SELECT id, userid, name, created_at FROM playlist WHERE id = ?")
                .bind(id)
                .fetch_optional(exec)
                .await?;

        Ok(row)
    }

    /// Insert playlist
    pub async fn insert<'e, E>(exec: E, userid: UserId, name: &str, created_at: i64) -> Result<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "INSERT INTO playlist (userid, name, created_at, last_updated) VALUES (?, ?, ?, ?)",
        )
        .bind(userid)
        .bind(name)
        .bind(created_at)
        .bind(created_at)
        .execute(exec)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Bump last_updated; false when the playlist does not exist
    ///
    /// Run as the first statement of a write transaction so the SQLite write
    /// lock is taken before any ownership read.
    pub async fn touch<'e, E>(exec: E, id: PlaylistId, now: i64) -> Result<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE playlist SET last_updated = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(exec)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete the playlist row only
    pub async fn delete<'e, E>(exec: E, id: PlaylistId) -> Result<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM playlist WHERE id = ?")
            .bind(id)
            .execute(exec)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Entries of a playlist in insertion order
    pub async fn videos<'e, E>(exec: E, id: PlaylistId) -> Result<Vec<VideoEntry>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows: Vec<VideoRow> = sqlx::query_as(
            r#"
            SELECT video_id, title, channel_title, view_count, formatted_view_count, thumbnail, added_at
            FROM playlist_video
            WHERE playlist_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(id)
        .fetch_all(exec)
        .await?;

        Ok(rows.into_iter().map(VideoRow::into_entry).collect())
    }

    pub async fn has_video<'e, E>(exec: E, id: PlaylistId, video_id: &str) -> Result<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM playlist_video WHERE playlist_id = ? AND video_id = ?",
        )
        .bind(id)
        .bind(video_id)
        .fetch_one(exec)
        .await?;

        Ok(row.0 > 0)
    }

    /// Append a video entry; fails on the (playlist_id, video_id) constraint
    pub async fn insert_video<'e, E>(
        exec: E,
        id: PlaylistId,
        video: &VideoRecord,
        added_at: i64,
    ) -> std::result::Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO playlist_video
                (playlist_id, video_id, title, channel_title, view_count, formatted_view_count, thumbnail, added_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&video.id)
        .bind(&video.title)
        .bind(&video.channel_title)
        .bind(video.view_count)
        .bind(&video.formatted_view_count)
        .bind(&video.thumbnail)
        .bind(added_at)
        .execute(exec)
        .await?;

        Ok(())
    }

    /// Remove one video; returns the number of rows removed
    pub async fn remove_video<'e, E>(exec: E, id: PlaylistId, video_id: &str) -> Result<u64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM playlist_video WHERE playlist_id = ? AND video_id = ?")
            .bind(id)
            .bind(video_id)
            .execute(exec)
            .await?;

        Ok(result.rows_affected())
    }

    /// Remove every entry of a playlist
    pub async fn clear_videos<'e, E>(exec: E, id: PlaylistId) -> Result<u64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM playlist_video WHERE playlist_id = ?")
            .bind(id)
            .execute(exec)
            .await?;

        Ok(result.rows_affected())
    }

    #[cfg(test)]
    pub async fn count_videos<'e, E>(exec: E, id: PlaylistId) -> Result<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM playlist_video WHERE playlist_id = ?")
            .bind(id)
            .fetch_one(exec)
            .await?;

        Ok(row.0)
    }
}
