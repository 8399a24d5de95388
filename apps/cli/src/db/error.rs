//! Database error types.

use thiserror::Error;
use wordmatch_core::StorageError;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<DbError> for StorageError {
    fn from(e: DbError) -> Self {
        Self::Backend(e.to_string())
    }
}
