//! Serializers for converting core results into API responses
//!
//! Every JSON body the API returns is one of these structures, so the wire
//! shapes live in one place.

use serde::Serialize;

use crate::models::*;

/// `GET /auth/status`
#[derive(Debug, Clone, Serialize)]
pub struct AuthStatusResponse {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl AuthStatusResponse {
    pub fn from_user(user: Option<&User>) -> Self {
        match user {
            Some(u) => Self {
                logged_in: true,
                user_id: Some(u.id),
                username: Some(u.username.clone()),
            },
            None => Self {
                logged_in: false,
                user_id: None,
                username: None,
            },
        }
    }
}

/// Login and register result
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user_id: UserId,
    pub username: String,
}

impl AuthResponse {
    pub fn new(message: &str, user: &User) -> Self {
        Self {
            message: message.to_string(),
            user_id: user.id,
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistListResponse {
    pub playlists: Vec<PlaylistSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistCreatedResponse {
    pub message: String,
    pub id: PlaylistId,
    pub name: String,
}

/// A playlist with its entries
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistResponse {
    pub id: PlaylistId,
    pub name: String,
    pub videos: Vec<VideoEntry>,
}

impl From<Playlist> for PlaylistResponse {
    fn from(p: Playlist) -> Self {
        Self {
            id: p.id,
            name: p.name,
            videos: p.videos,
        }
    }
}

/// Add-video result: the message plus the playlist's updated summary
#[derive(Debug, Clone, Serialize)]
pub struct VideoAddedResponse {
    pub message: String,
    pub playlist: PlaylistSummary,
}

/// Any list of videos (recommendations, reacted videos)
#[derive(Debug, Clone, Serialize)]
pub struct VideosResponse<T: Serialize> {
    pub videos: Vec<T>,
}
