//! Error types for wordmatch-core.

use thiserror::Error;

/// Result type alias using RoundError.
pub type Result<T> = std::result::Result<T, RoundError>;

/// Reasons a round cannot be started. Shown to the user as a blocking notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("no folder selected")]
    NoFolderSelected,

    #[error("folder not found: {0}")]
    UnknownFolder(String),

    #[error("folder is empty: {0}")]
    EmptyFolder(String),

    #[error("no previous round to restart")]
    NothingToRestart,
}

/// Failures reported by a key/value backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Failure to play an audio cue. Callers log and drop these.
#[derive(Debug, Error)]
pub enum CueError {
    #[error("cue playback rejected: {0}")]
    Rejected(String),

    #[error("audio output error: {0}")]
    Io(#[from] std::io::Error),
}
