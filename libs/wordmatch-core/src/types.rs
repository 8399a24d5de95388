//! Core types for the word matching game.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Separator between the normalized halves of a pair id.
const PAIR_ID_SEPARATOR: &str = "|||";

/// A (known-language word, learning-language word) tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub known: String,
    pub learn: String,
}

impl WordPair {
    pub fn new(known: impl Into<String>, learn: impl Into<String>) -> Self {
        Self {
            known: known.into(),
            learn: learn.into(),
        }
    }

    pub fn pair_id(&self) -> PairId {
        PairId::new(&self.known, &self.learn)
    }

    /// Copy with surrounding whitespace removed from both fields.
    pub fn trimmed(&self) -> Self {
        Self::new(self.known.trim(), self.learn.trim())
    }

    /// True when either side is blank after trimming.
    pub fn is_blank(&self) -> bool {
        self.known.trim().is_empty() || self.learn.trim().is_empty()
    }
}

/// Deterministic identity of a pair: trimmed, lower-cased fields joined by a separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairId(String);

impl PairId {
    pub fn new(known: &str, learn: &str) -> Self {
        Self(format!(
            "{}{}{}",
            known.trim().to_lowercase(),
            PAIR_ID_SEPARATOR,
            learn.trim().to_lowercase()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Folder name to its pairs.
pub type FolderMap = BTreeMap<String, Vec<WordPair>>;

/// Which column a card sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Known,
    Learn,
}

/// Counters shown by the HUD and frozen into the end-of-round summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub moves: u32,
    pub matches: u32,
    pub total_pairs: u32,
    pub seconds: u64,
}

impl SessionStats {
    pub fn for_round(total_pairs: u32) -> Self {
        Self {
            total_pairs,
            ..Self::default()
        }
    }

    /// Matched share in whole percent, 0 when there are no pairs.
    pub fn accuracy(&self) -> u32 {
        if self.total_pairs == 0 {
            return 0;
        }
        (f64::from(self.matches) / f64::from(self.total_pairs) * 100.0).round() as u32
    }
}

/// Figures displayed when a round ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub pairs_found: u32,
    pub total_pairs: u32,
    pub accuracy: u32,
    pub seconds: u64,
    pub moves: u32,
}

impl RoundSummary {
    /// Elapsed time as `m:ss`.
    pub fn format_time(&self) -> String {
        format!("{}:{:02}", self.seconds / 60, self.seconds % 60)
    }
}

impl From<SessionStats> for RoundSummary {
    fn from(stats: SessionStats) -> Self {
        Self {
            pairs_found: stats.matches,
            total_pairs: stats.total_pairs,
            accuracy: stats.accuracy(),
            seconds: stats.seconds,
            moves: stats.moves,
        }
    }
}

/// Where the controller is in the round lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Idle,
    Active,
    Finished,
}

/// Navigation requested by the game; the host performs the routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationIntent {
    Menu,
    EditWords,
}

/// Mute flag and volume pushed into the cue player when a round starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    pub muted: bool,
    pub volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            muted: false,
            volume: 1.0,
        }
    }
}

impl AudioSettings {
    /// Copy with the volume forced into `0.0..=1.0` (NaN becomes 0).
    pub fn clamped(self) -> Self {
        let volume = if self.volume.is_nan() {
            0.0
        } else {
            self.volume.clamp(0.0, 1.0)
        };
        Self { volume, ..self }
    }
}
