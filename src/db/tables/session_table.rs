//! Session table operations

use sqlx::{Executor, FromRow, Sqlite};

use crate::error::Result;
use crate::models::{Session, UserId};

#[derive(Debug, FromRow)]
struct SessionRow {
    token: String,
    userid: i64,
    created_at: i64,
    expires_at: i64,
    revoked: bool,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            token: self.token,
            user_id: self.userid,
            created_at: self.created_at,
            expires_at: self.expires_at,
            revoked: self.revoked,
        }
    }
}

/// Session table operations
pub struct SessionTable;

impl SessionTable {
    pub async fn insert<'e, E>(exec: E, session: &Session) -> Result<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "INSERT INTO session (token, userid, created_at, expires_at, revoked) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&session.token)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .bind(session.revoked)
        .execute(exec)
        .await?;

        Ok(())
    }

    /// Look a session up by token, whatever its state
    pub async fn get<'e, E>(exec: E, token: &str) -> Result<Option<Session>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: Option<SessionRow> = sqlx::query_as("SELECT * FROM session WHERE token = ?")
            .bind(token)
            .fetch_optional(exec)
            .await?;

        Ok(row.map(SessionRow::into_session))
    }

    /// Mark a session revoked; false when the token is unknown
    pub async fn revoke<'e, E>(exec: E, token: &str) -> Result<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE session SET revoked = 1 WHERE token = ?")
            .bind(token)
            .execute(exec)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Revoke every session of a user
    pub async fn revoke_all_for_user<'e, E>(exec: E, userid: UserId) -> Result<u64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE session SET revoked = 1 WHERE userid = ? AND revoked = 0")
            .bind(userid)
            .execute(exec)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete sessions that expired before `now` or were revoked
    pub async fn delete_stale<'e, E>(exec: E, now: i64) -> Result<u64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM session WHERE expires_at <= ? OR revoked = 1")
            .bind(now)
            .execute(exec)
            .await?;

        Ok(result.rows_affected())
    }
}
