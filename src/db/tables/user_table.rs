//! User table operations

use sqlx::{Executor, FromRow, Sqlite};

use crate::db::tables::is_unique_violation;
use crate::error::{MuzeeError, Result};
use crate::models::{User, UserId};

/// Database row for user table
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password: String,
    created_at: i64,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            password: self.password,
            created_at: self.created_at,
        }
    }
}

/// User table operations
pub struct UserTable;

impl UserTable {
    /// Get user by ID
    pub async fn get_by_id<'e, E>(exec: E, id: UserId) -> Result<Option<User>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM user WHERE id = ?")
            .bind(id)
            .fetch_optional(exec)
            .await?;

        Ok(row.map(UserRow::into_user))
    }

    /// Get user by exact username
    pub async fn get_by_username<'e, E>(exec: E, username: &str) -> Result<Option<User>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM user WHERE username = ?")
            .bind(username)
            .fetch_optional(exec)
            .await?;

        Ok(row.map(UserRow::into_user))
    }

    /// Insert a user, returning it with its new id
    pub async fn insert<'e, E>(exec: E, user: &User) -> Result<User>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result =
            sqlx::query("INSERT INTO user (username, password, created_at) VALUES (?, ?, ?)")
                .bind(&user.username)
                .bind(&user.password)
                .bind(user.created_at)
                .execute(exec)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        MuzeeError::UsernameTaken
                    } else {
                        MuzeeError::Database(e)
                    }
                })?;

        Ok(User {
            id: result.last_insert_rowid(),
            ..user.clone()
        })
    }

    /// Update only the password for a user
    pub async fn update_password<'e, E>(exec: E, id: UserId, password_hash: &str) -> Result<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE user SET password = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(exec)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
