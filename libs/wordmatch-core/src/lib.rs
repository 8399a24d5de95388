//! Core library for the word matching game.
//!
//! Provides:
//! - Folder storage over a pluggable key/value backend (with legacy migration)
//! - Round queue building (clamped, shuffled pair selection)
//! - The visible card window and the selection/evaluation engine
//! - Round-owned scheduled tasks for timing and animations
//! - A game controller that owns the active round and plays audio cues

pub mod audio;
pub mod controller;
pub mod error;
pub mod queue;
pub mod round;
pub mod schedule;
pub mod storage;
pub mod store;
pub mod types;
pub mod window;

pub use audio::{Cue, CuePlayer, SilentCues};
pub use controller::{GameController, RoundSetup};
pub use error::{CueError, Result, RoundError, StorageError};
pub use queue::{final_pair_count, parse_requested_count, round_rng, RoundQueue};
pub use round::{CardView, ClickOutcome, Round, RoundOptions, Selection};
pub use storage::{KeyValueStore, MemoryStore};
pub use store::{folder_names, validate_folder_map, FolderMapCheck, MergeResult, PairStore};
pub use types::{
    AudioSettings, FolderMap, GamePhase, NavigationIntent, PairId, RoundSummary, SessionStats,
    Side, WordPair,
};
pub use window::{CardUid, VisibleCard, VisibleWindow, MAX_VISIBLE};
