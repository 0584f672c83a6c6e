//! Core library functions for muzee

pub mod access;
pub mod fallback;
pub mod normalize;
pub mod playlistlib;
pub mod reactions;
pub mod recommendations;
pub mod sessions;

pub use access::PlaylistService;
pub use playlistlib::PlaylistRepository;
pub use reactions::ReactionLib;
pub use recommendations::{Preferences, Recommender, VideoSource};
pub use sessions::{Credentials, Login, SessionStore};
