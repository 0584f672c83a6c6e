//! Error taxonomy shared by the session store, playlist repository and API

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MuzeeError>;

#[derive(Debug, Error)]
pub enum MuzeeError {
    /// No active session behind the request
    #[error("Login required")]
    Unauthenticated,

    /// The playlist exists but belongs to another user
    #[error("Playlist belongs to another user")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Video is already in the playlist")]
    DuplicateVideo,

    #[error("Video is not in the playlist")]
    VideoNotInPlaylist,

    #[error("Malformed video result: {0}")]
    MalformedResult(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Upstream API error: {0}")]
    Upstream(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl MuzeeError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<reqwest::Error> for MuzeeError {
    fn from(err: reqwest::Error) -> Self {
        MuzeeError::Upstream(err.to_string())
    }
}

impl ResponseError for MuzeeError {
    fn status_code(&self) -> StatusCode {
        match self {
            MuzeeError::Unauthenticated | MuzeeError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            MuzeeError::Forbidden => StatusCode::FORBIDDEN,
            MuzeeError::NotFound(_) | MuzeeError::VideoNotInPlaylist => StatusCode::NOT_FOUND,
            MuzeeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            MuzeeError::UsernameTaken | MuzeeError::DuplicateVideo => StatusCode::CONFLICT,
            MuzeeError::MalformedResult(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MuzeeError::Upstream(_) => StatusCode::BAD_GATEWAY,
            MuzeeError::Database(_) | MuzeeError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            MuzeeError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            MuzeeError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                "Internal server error".to_string()
            }
            MuzeeError::Upstream(msg) => {
                tracing::error!("Upstream API error: {}", msg);
                "Could not fetch recommendations".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}
