//! Configuration module for muzee
//!
//! Filesystem layout plus the user-editable settings file.

mod paths;
mod user_config;

pub use paths::Paths;
pub use user_config::UserConfig;

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "muzee_session";

/// Length of generated session tokens
pub const SESSION_TOKEN_LEN: usize = 48;
