//! Data models for muzee
//!
//! This module contains the core data structures shared by the storage layer,
//! the session store and the API.

mod playlist;
mod reaction;
mod session;
mod user;
mod video;

pub use playlist::{Playlist, PlaylistSummary};
pub use reaction::{ReactionCounts, ReactionKind, ReactedVideo};
pub use session::Session;
pub use user::User;
pub use video::{VideoEntry, VideoRecord};

/// Database id of a user
pub type UserId = i64;

/// Database id of a playlist
pub type PlaylistId = i64;
