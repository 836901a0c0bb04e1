//! PostgreSQL store implementations.

pub mod file;
pub mod quota;
pub mod version;

pub use file::PgFileStore;
pub use quota::PgQuotaStore;
pub use version::PgVersionStore;

use sqlx::Error as SqlxError;

use stratus_core::error::{AppError, ErrorKind};

/// Map a sqlx error into an [`AppError`], surfacing unique-constraint
/// violations as conflicts.
pub(crate) fn map_db_err(context: &str, err: SqlxError) -> AppError {
    let unique = err
        .as_database_error()
        .is_some_and(|d| d.is_unique_violation());
    if unique {
        AppError::with_source(ErrorKind::Conflict, format!("{context}: duplicate key"), err)
    } else {
        AppError::with_source(ErrorKind::Database, context.to_string(), err)
    }
}
