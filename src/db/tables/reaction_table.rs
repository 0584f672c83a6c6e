//! Video reaction table operations

use std::collections::HashMap;

use sqlx::{Executor, FromRow, Sqlite};

use crate::error::Result;
use crate::models::{ReactedVideo, ReactionKind, UserId};

#[derive(Debug, FromRow)]
struct ReactedRow {
    video_id: String,
    title: String,
    channel_title: String,
    thumbnail: Option<String>,
}

/// Video reaction table operations
pub struct ReactionTable;

impl ReactionTable {
    /// Record (or replace) a user's reaction to a video
    pub async fn upsert<'e, E>(
        exec: E,
        userid: UserId,
        video: &ReactedVideo,
        kind: ReactionKind,
    ) -> Result<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO video_reaction (userid, video_id, title, channel_title, thumbnail, reaction)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (userid, video_id) DO UPDATE SET
                title = excluded.title,
                channel_title = excluded.channel_title,
                thumbnail = excluded.thumbnail,
                reaction = excluded.reaction
            "#,
        )
        .bind(userid)
        .bind(&video.id)
        .bind(&video.title)
        .bind(&video.channel_title)
        .bind(&video.thumbnail)
        .bind(kind.as_str())
        .execute(exec)
        .await?;

        Ok(())
    }

    pub async fn remove<'e, E>(exec: E, userid: UserId, video_id: &str) -> Result<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM video_reaction WHERE userid = ? AND video_id = ?")
            .bind(userid)
            .bind(video_id)
            .execute(exec)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// (likes, dislikes) for one video
    pub async fn counts<'e, E>(exec: E, video_id: &str) -> Result<(i64, i64)>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN reaction = 'like' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN reaction = 'dislike' THEN 1 ELSE 0 END), 0)
            FROM video_reaction
            WHERE video_id = ?
            "#,
        )
        .bind(video_id)
        .fetch_one(exec)
        .await?;

        Ok(row)
    }

    /// (likes, dislikes) for every video that has at least one reaction
    pub async fn all_counts<'e, E>(exec: E) -> Result<HashMap<String, (i64, i64)>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows: Vec<(String, i64, i64)> = sqlx::query_as(
            r#"
            SELECT
                video_id,
                SUM(CASE WHEN reaction = 'like' THEN 1 ELSE 0 END),
                SUM(CASE WHEN reaction = 'dislike' THEN 1 ELSE 0 END)
            FROM video_reaction
            GROUP BY video_id
            "#,
        )
        .fetch_all(exec)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, likes, dislikes)| (id, (likes, dislikes)))
            .collect())
    }

    pub async fn user_reaction<'e, E>(
        exec: E,
        userid: UserId,
        video_id: &str,
    ) -> Result<Option<ReactionKind>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT reaction FROM video_reaction WHERE userid = ? AND video_id = ?")
                .bind(userid)
                .bind(video_id)
                .fetch_optional(exec)
                .await?;

        Ok(row.and_then(|(r,)| ReactionKind::parse(&r)))
    }

    /// Videos a user reacted to with `kind`
    pub async fn videos_for_user<'e, E>(
        exec: E,
        userid: UserId,
        kind: ReactionKind,
    ) -> Result<Vec<ReactedVideo>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows: Vec<ReactedRow> = sqlx::query_as(
            r#"
            SELECT video_id, title, channel_title, thumbnail
            FROM video_reaction
            WHERE userid = ? AND reaction = ?
            ORDER BY id ASC
            "#,
        )
        .bind(userid)
        .bind(kind.as_str())
        .fetch_all(exec)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ReactedVideo {
                id: r.video_id,
                title: r.title,
                channel_title: r.channel_title,
                thumbnail: r.thumbnail,
            })
            .collect())
    }
}
