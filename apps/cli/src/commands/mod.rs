//! Commands behind the CLI subcommands.

pub mod folder;
pub mod settings;

use serde::Serialize;
use thiserror::Error;

pub use folder::{
    add_pairs, create_folder, last_round_setup, list_folders, reset_storage, show_folder,
    FolderSummary, RoundDefaults,
};
pub use settings::{get_audio_settings, save_audio_settings};

/// Error returned to the user by a command.
#[derive(Debug, Serialize, Error)]
#[error("{message}")]
pub struct CommandError {
    pub message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<crate::db::DbError> for CommandError {
    fn from(e: crate::db::DbError) -> Self {
        Self { message: e.to_string() }
    }
}
