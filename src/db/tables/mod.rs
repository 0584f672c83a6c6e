//! Database table operations
//!
//! Every function takes an executor so callers can run it on the pool or
//! inside a transaction (`&mut *tx`).

mod playlist_table;
mod reaction_table;
mod session_table;
mod user_table;

pub use playlist_table::{PlaylistRow, PlaylistTable};
pub use reaction_table::ReactionTable;
pub use session_table::SessionTable;
pub use user_table::UserTable;

/// True when the error is a UNIQUE constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
