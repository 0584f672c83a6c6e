//! Utility modules for muzee

pub mod auth;
pub mod format;
pub mod tools;
