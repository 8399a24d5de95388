//! Round queue: the shuffled, bounded selection of pairs played in one round.

use crate::error::{Result, RoundError};
use crate::types::{PairId, WordPair};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::num::IntErrorKind;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Smallest number of pairs a round asks for.
pub const MIN_PAIRS: i64 = 2;

/// Random source for shuffling.
///
/// Seeded from the operating system; if that source is unavailable a
/// time-seeded generator is used instead.
pub fn round_rng() -> StdRng {
    StdRng::try_from_os_rng().unwrap_or_else(|e| {
        warn!(error = %e, "os random source unavailable, falling back to time seed");
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        StdRng::seed_from_u64(nanos)
    })
}

/// Interpret the user's pair-count input.
///
/// Reads the leading integer of the trimmed text (`"12 pairs"` is 12).
/// Missing, non-numeric and zero input all mean [`MIN_PAIRS`]. Digit runs too
/// long for `i64` saturate, so an oversized request still clamps to the folder.
pub fn parse_requested_count(input: Option<&str>) -> i64 {
    let Some(text) = input.map(str::trim) else {
        return MIN_PAIRS;
    };

    let mut end = 0;
    for (idx, ch) in text.char_indices() {
        let is_sign = idx == 0 && (ch == '-' || ch == '+');
        if !(is_sign || ch.is_ascii_digit()) {
            break;
        }
        end = idx + ch.len_utf8();
    }

    match text[..end].parse::<i64>() {
        Ok(0) => MIN_PAIRS,
        Ok(n) => n,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => MIN_PAIRS,
        },
    }
}

/// `clamp(requested, 2, available)`, never more than `available`.
pub fn final_pair_count(requested: i64, available: usize) -> usize {
    let upper = i64::try_from(available).unwrap_or(i64::MAX);
    requested.max(MIN_PAIRS).min(upper).max(0) as usize
}

/// A pair scheduled for the round together with its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedPair {
    pub pair: WordPair,
    pub pair_id: PairId,
}

impl From<WordPair> for QueuedPair {
    fn from(pair: WordPair) -> Self {
        let pair_id = pair.pair_id();
        Self { pair, pair_id }
    }
}

/// Pairs for one round, consumed front to back.
#[derive(Debug, Clone)]
pub struct RoundQueue {
    pairs: Vec<QueuedPair>,
    cursor: usize,
}

impl RoundQueue {
    /// Shuffle a copy of `pairs` and keep the first `final_pair_count` of them.
    pub fn build<R: Rng + ?Sized>(pairs: &[WordPair], requested: i64, rng: &mut R) -> Result<Self> {
        if pairs.is_empty() {
            return Err(RoundError::EmptyFolder(String::new()));
        }

        let count = final_pair_count(requested, pairs.len());
        let mut shuffled = pairs.to_vec();
        shuffled.shuffle(rng);
        shuffled.truncate(count);

        Ok(Self::from_pairs(shuffled))
    }

    /// Queue in the given order, without shuffling.
    pub fn from_pairs(pairs: Vec<WordPair>) -> Self {
        Self {
            pairs: pairs.into_iter().map(QueuedPair::from).collect(),
            cursor: 0,
        }
    }

    /// Number of pairs in the round.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs not yet handed out.
    pub fn remaining(&self) -> usize {
        self.pairs.len() - self.cursor
    }

    /// Hand out the next pair, if any.
    pub fn next_pair(&mut self) -> Option<QueuedPair> {
        let next = self.pairs.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(next)
    }

    /// Hand out up to `count` pairs from the front.
    pub fn take(&mut self, count: usize) -> Vec<QueuedPair> {
        let end = (self.cursor + count).min(self.pairs.len());
        let taken = self.pairs[self.cursor..end].to_vec();
        self.cursor = end;
        taken
    }
}
