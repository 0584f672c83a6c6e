//! Playlist model

use serde::{Deserialize, Serialize};

use super::{PlaylistId, UserId, VideoEntry};

/// A named, ordered, user-owned collection of video entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    /// Database ID
    pub id: PlaylistId,
    /// Owner user ID, fixed at creation
    #[serde(skip_serializing)]
    pub owner: UserId,
    /// Display name, never empty after trimming
    pub name: String,
    /// Unix timestamp of creation
    #[serde(skip_serializing)]
    pub created_at: i64,
    /// Entries in insertion order
    #[serde(default)]
    pub videos: Vec<VideoEntry>,
}

impl Playlist {
    pub fn count(&self) -> usize {
        self.videos.len()
    }

    pub fn summary(&self) -> PlaylistSummary {
        PlaylistSummary {
            id: self.id,
            name: self.name.clone(),
            count: self.videos.len() as i64,
        }
    }
}

impl PartialEq for Playlist {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Playlist {}

/// Playlist listing row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: PlaylistId,
    pub name: String,
    pub count: i64,
}
