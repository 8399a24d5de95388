//! Durable folder storage on top of a [`KeyValueStore`].
//!
//! Every operation is best-effort: backend failures and corrupt entries are
//! logged and degrade to empty/default values, never to an error for the caller.
//!
//! # Layout
//! - `wordFolders_v2`: JSON object `{ "<folder>": [{"known": "..", "learn": ".."}] }`
//! - `mp_last_folder`: last played folder name
//! - `mp_last_pairs`: last played pair count, as decimal text
//!
//! Older builds wrote the folder map under `wordFolders`, `matchbox-folders` or
//! `folders`; the first of those that validates is migrated once.

use crate::storage::KeyValueStore;
use crate::types::{FolderMap, PairId, WordPair};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub const FOLDERS_KEY: &str = "wordFolders_v2";
pub const LEGACY_FOLDER_KEYS: [&str; 3] = ["wordFolders", "matchbox-folders", "folders"];
pub const LAST_FOLDER_KEY: &str = "mp_last_folder";
pub const LAST_PAIRS_KEY: &str = "mp_last_pairs";

/// Folder seeded into an empty store.
pub const DEFAULT_FOLDER: &str = "Przykład";

const DEFAULT_PAIRS: [(&str, &str); 4] = [
    ("cat", "kot"),
    ("dog", "pies"),
    ("house", "dom"),
    ("car", "samochód"),
];

/// Outcome of checking raw stored text against the folder map schema.
#[derive(Debug, Clone, PartialEq)]
pub enum FolderMapCheck {
    Valid(FolderMap),
    Rejected(String),
}

/// Validate stored text: an object of string keys to arrays of `{known, learn}` string objects.
pub fn validate_folder_map(raw: &str) -> FolderMapCheck {
    match serde_json::from_str::<FolderMap>(raw) {
        Ok(map) => FolderMapCheck::Valid(map),
        Err(e) => FolderMapCheck::Rejected(e.to_string()),
    }
}

/// Result of merging pairs into a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeResult {
    pub added: usize,
}

/// Folder names in ascending, case-insensitive order.
pub fn folder_names(folders: &FolderMap) -> Vec<String> {
    let mut names: Vec<String> = folders.keys().cloned().collect();
    names.sort_by(|a, b| compare_names(a, b));
    names
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Folder persistence plus the remembered round setup.
pub struct PairStore<S> {
    backend: S,
}

impl<S: KeyValueStore> PairStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Read the folder map, migrating legacy keys and dropping corrupt entries.
    pub fn load(&mut self) -> FolderMap {
        if let Some(raw) = self.read(FOLDERS_KEY) {
            match validate_folder_map(&raw) {
                FolderMapCheck::Valid(map) => return map,
                FolderMapCheck::Rejected(reason) => {
                    warn!(key = FOLDERS_KEY, %reason, "discarding corrupt folder data");
                    self.delete(FOLDERS_KEY);
                }
            }
        }

        for key in LEGACY_FOLDER_KEYS {
            let Some(raw) = self.read(key) else {
                continue;
            };
            match validate_folder_map(&raw) {
                FolderMapCheck::Valid(map) => {
                    info!(from = key, folders = map.len(), "migrating legacy folder data");
                    self.save(&map);
                    self.delete(key);
                    return map;
                }
                FolderMapCheck::Rejected(reason) => {
                    debug!(key, %reason, "legacy folder data does not validate");
                }
            }
        }

        FolderMap::new()
    }

    /// Seed the example folder when there are no folders at all.
    pub fn ensure_defaults(&mut self, folders: FolderMap) -> FolderMap {
        if !folders.is_empty() {
            return folders;
        }

        let mut seeded = FolderMap::new();
        seeded.insert(
            DEFAULT_FOLDER.to_string(),
            DEFAULT_PAIRS
                .iter()
                .map(|(known, learn)| WordPair::new(*known, *learn))
                .collect(),
        );
        info!(folder = DEFAULT_FOLDER, "seeded default folder");
        self.save(&seeded);
        seeded
    }

    /// Overwrite the stored folder map as a whole.
    pub fn save(&mut self, folders: &FolderMap) {
        match serde_json::to_string(folders) {
            Ok(json) => self.write(FOLDERS_KEY, &json),
            Err(e) => warn!(error = %e, "failed to encode folder data"),
        }
    }

    /// Create an empty folder if it does not exist yet.
    pub fn ensure_folder(&mut self, folders: &mut FolderMap, name: &str) {
        if folders.contains_key(name) {
            return;
        }
        folders.insert(name.to_string(), Vec::new());
        self.save(folders);
    }

    /// Add trimmed, non-blank pairs whose pair id is new to the folder.
    pub fn merge_pairs_into_folder(
        &mut self,
        folders: &mut FolderMap,
        name: &str,
        incoming: &[WordPair],
    ) -> MergeResult {
        let folder = folders.entry(name.to_string()).or_default();
        let mut seen: HashSet<PairId> = folder.iter().map(WordPair::pair_id).collect();

        let mut added = 0;
        for pair in incoming {
            if pair.is_blank() {
                continue;
            }
            if seen.insert(pair.pair_id()) {
                folder.push(pair.trimmed());
                added += 1;
            }
        }

        info!(folder = name, added, "merged pairs");
        self.save(folders);
        MergeResult { added }
    }

    pub fn last_folder(&self) -> Option<String> {
        self.read(LAST_FOLDER_KEY).filter(|name| !name.is_empty())
    }

    pub fn set_last_folder(&mut self, name: &str) {
        self.write(LAST_FOLDER_KEY, name);
    }

    pub fn last_pair_count(&self) -> Option<u32> {
        self.read(LAST_PAIRS_KEY)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
    }

    pub fn set_last_pair_count(&mut self, count: u32) {
        self.write(LAST_PAIRS_KEY, &count.to_string());
    }

    /// Remove every key this store owns.
    pub fn reset_all(&mut self) {
        self.delete(FOLDERS_KEY);
        self.delete(LAST_FOLDER_KEY);
        self.delete(LAST_PAIRS_KEY);
        for key in LEGACY_FOLDER_KEYS {
            self.delete(key);
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "storage read failed");
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.backend.set(key, value) {
            warn!(key, error = %e, "storage write failed");
        }
    }

    fn delete(&mut self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            warn!(key, error = %e, "storage delete failed");
        }
    }
}
