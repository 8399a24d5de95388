//! Application state.

use crate::db::SqliteRepository;
use wordmatch_core::{FolderMap, PairStore};

/// State shared by every command.
pub struct AppState {
    pub store: PairStore<SqliteRepository>,
    /// Folder map as last loaded or written; kept in sync with the store.
    pub folders: FolderMap,
}

impl AppState {
    /// Load folders (migrating legacy data) and seed the example folder if none exist.
    pub fn new(repository: SqliteRepository) -> Self {
        let mut store = PairStore::new(repository);
        let loaded = store.load();
        let folders = store.ensure_defaults(loaded);
        Self { store, folders }
    }

    pub fn repository(&self) -> &SqliteRepository {
        self.store.backend()
    }

    /// Re-read folders from the database.
    pub fn reload(&mut self) {
        let loaded = self.store.load();
        self.folders = self.store.ensure_defaults(loaded);
    }
}
