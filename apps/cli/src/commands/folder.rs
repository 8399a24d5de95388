//! Folder-related commands.

use super::CommandError;
use crate::state::AppState;
use serde::Serialize;
use tracing::info;
use wordmatch_core::{folder_names, MergeResult, WordPair};

/// Pair count offered when nothing has been played yet.
pub const DEFAULT_PAIR_COUNT: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderSummary {
    pub name: String,
    pub pair_count: usize,
}

/// Folder and pair count pre-filled on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundDefaults {
    pub folder: Option<String>,
    pub pair_count: u32,
}

/// List folders in display order.
pub fn list_folders(state: &AppState) -> Vec<FolderSummary> {
    folder_names(&state.folders)
        .into_iter()
        .map(|name| {
            let pair_count = state.folders.get(&name).map_or(0, Vec::len);
            FolderSummary { name, pair_count }
        })
        .collect()
}

/// Pairs of one folder, in stored order.
pub fn show_folder(state: &AppState, name: &str) -> Result<Vec<WordPair>, CommandError> {
    state
        .folders
        .get(name.trim())
        .cloned()
        .ok_or_else(|| CommandError::new(format!("folder {:?} does not exist", name.trim())))
}

/// Create an empty folder; an existing folder is left untouched.
pub fn create_folder(state: &mut AppState, name: &str) -> Result<FolderSummary, CommandError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CommandError::new("enter a folder name"));
    }
    state.store.ensure_folder(&mut state.folders, name);
    Ok(FolderSummary {
        name: name.to_string(),
        pair_count: state.folders.get(name).map_or(0, Vec::len),
    })
}

/// Merge pairs into a folder, creating it when missing.
pub fn add_pairs(
    state: &mut AppState,
    folder: &str,
    pairs: &[WordPair],
) -> Result<MergeResult, CommandError> {
    let folder = folder.trim();
    if folder.is_empty() {
        return Err(CommandError::new("choose or create a folder first"));
    }
    if pairs.iter().all(WordPair::is_blank) {
        return Err(CommandError::new("no pairs to save"));
    }
    Ok(state
        .store
        .merge_pairs_into_folder(&mut state.folders, folder, pairs))
}

/// Delete all stored folders and round defaults, then reseed the example folder.
///
/// Returns the folders left afterwards.
pub fn reset_storage(state: &mut AppState) -> Vec<FolderSummary> {
    state.store.reset_all();
    state.reload();
    info!("storage reset");
    list_folders(state)
}

/// The last played folder (if it still exists, else the first folder) and pair count.
pub fn last_round_setup(state: &AppState) -> RoundDefaults {
    let names = folder_names(&state.folders);
    let folder = state
        .store
        .last_folder()
        .filter(|name| state.folders.contains_key(name))
        .or_else(|| names.into_iter().next());
    RoundDefaults {
        folder,
        pair_count: state.store.last_pair_count().unwrap_or(DEFAULT_PAIR_COUNT),
    }
}
