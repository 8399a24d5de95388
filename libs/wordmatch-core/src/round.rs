//! Round engine: selection, evaluation, timing and end-of-round detection.
//!
//! A [`Round`] is created when the player presses start and is dropped when
//! they restart or leave. Time is always passed in by the caller; deferred
//! work (timer ticks, fade-out removal, appear and mismatch clears) lives in
//! the round's own [`TaskQueue`] and is run from [`Round::advance`].

use crate::audio::Cue;
use crate::queue::RoundQueue;
use crate::schedule::{Task, TaskId, TaskQueue};
use crate::types::{RoundSummary, SessionStats, Side};
use crate::window::{CardUid, VisibleWindow, MAX_VISIBLE};
use rand::rngs::StdRng;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Engine tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOptions {
    /// Cards shown per side.
    pub max_visible: usize,
    /// Interval between elapsed-time updates; raised to 1 ms if zero.
    pub tick: Duration,
    /// Delay between a match and the removal of its cards.
    pub fade_out: Duration,
    /// How long freshly dealt cards stay marked as appearing.
    pub appear: Duration,
    /// How long a wrong pair stays selected.
    pub mismatch_clear: Duration,
}

/// Shortest accepted tick; a zero tick would be due again immediately.
const MIN_TICK: Duration = Duration::from_millis(1);

impl Default for RoundOptions {
    fn default() -> Self {
        Self {
            max_visible: MAX_VISIBLE,
            tick: Duration::from_millis(200),
            fade_out: Duration::from_millis(500),
            appear: Duration::from_millis(400),
            mismatch_clear: Duration::from_millis(600),
        }
    }
}

/// Selected deck index per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub known: Option<usize>,
    pub learn: Option<usize>,
}

impl Selection {
    pub fn get(&self, side: Side) -> Option<usize> {
        match side {
            Side::Known => self.known,
            Side::Learn => self.learn,
        }
    }

    fn set(&mut self, side: Side, index: Option<usize>) {
        match side {
            Side::Known => self.known = index,
            Side::Learn => self.learn = index,
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickOutcome {
    /// Round not active, no such card, or the card is already matched.
    Ignored,
    Selected,
    Deselected,
    Matched { finished: bool },
    Mismatched,
}

impl ClickOutcome {
    /// Cue to play for this outcome.
    pub fn cue(self) -> Option<Cue> {
        match self {
            Self::Matched { .. } => Some(Cue::Success),
            Self::Mismatched => Some(Cue::Failure),
            _ => None,
        }
    }
}

/// Render-ready state of one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub uid: CardUid,
    pub word: String,
    pub selected: bool,
    pub matched: bool,
    pub fading: bool,
    pub appearing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundState {
    Active,
    Finished,
}

/// One play session over a fixed subset of a folder.
#[derive(Debug)]
pub struct Round {
    folder: String,
    options: RoundOptions,
    window: VisibleWindow,
    selection: Selection,
    stats: SessionStats,
    state: RoundState,
    started_at: Instant,
    tasks: TaskQueue,
    mismatch_task: Option<TaskId>,
    rng: StdRng,
}

impl Round {
    /// Deal the opening window and start the clock.
    pub fn start(
        folder: impl Into<String>,
        queue: RoundQueue,
        mut options: RoundOptions,
        mut rng: StdRng,
        now: Instant,
    ) -> Self {
        options.tick = options.tick.max(MIN_TICK);
        let total_pairs = u32::try_from(queue.len()).unwrap_or(u32::MAX);
        let window = VisibleWindow::fill(queue, options.max_visible, &mut rng);

        let mut round = Self {
            folder: folder.into(),
            options,
            window,
            selection: Selection::default(),
            stats: SessionStats::for_round(total_pairs),
            state: RoundState::Active,
            started_at: now,
            tasks: TaskQueue::new(),
            mismatch_task: None,
            rng,
        };

        debug!(folder = %round.folder, total_pairs, "round started");
        if total_pairs == 0 {
            round.finalize(now);
        } else {
            round.tasks.schedule(now + options.tick, Task::Tick);
        }
        round
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn is_active(&self) -> bool {
        self.state == RoundState::Active
    }

    pub fn is_finished(&self) -> bool {
        self.state == RoundState::Finished
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn window(&self) -> &VisibleWindow {
        &self.window
    }

    /// Final figures, once the round has finished.
    pub fn summary(&self) -> Option<RoundSummary> {
        self.is_finished().then(|| RoundSummary::from(self.stats))
    }

    /// When [`Round::advance`] next has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.next_due()
    }

    pub fn cards(&self, side: Side) -> Vec<CardView> {
        let selected = self.selection.get(side);
        self.window
            .deck(side)
            .iter()
            .enumerate()
            .map(|(idx, card)| CardView {
                uid: card.uid,
                word: card.word.clone(),
                selected: selected == Some(idx),
                matched: self.window.is_matched(card.uid),
                fading: self.window.is_fading(card.uid),
                appearing: self.window.is_appearing(card.uid),
            })
            .collect()
    }

    /// Handle a click on the card at `index` of `side`.
    pub fn click(&mut self, side: Side, index: usize, now: Instant) -> ClickOutcome {
        if !self.is_active() {
            return ClickOutcome::Ignored;
        }
        match self.window.card(side, index) {
            Some(card) if !self.window.is_matched(card.uid) => {}
            _ => return ClickOutcome::Ignored,
        }

        if self.selection.get(side) == Some(index) {
            self.selection.set(side, None);
            return ClickOutcome::Deselected;
        }

        self.selection.set(side, Some(index));
        match (self.selection.known, self.selection.learn) {
            (Some(known), Some(learn)) => self.evaluate(known, learn, now),
            _ => ClickOutcome::Selected,
        }
    }

    /// Run every task due at `now`. Returns how many ran.
    pub fn advance(&mut self, now: Instant) -> usize {
        let mut ran = 0;
        while let Some((id, task)) = self.tasks.pop_due(now) {
            if self.mismatch_task == Some(id) {
                self.mismatch_task = None;
            }
            self.run(task, now);
            ran += 1;
        }
        ran
    }

    fn run(&mut self, task: Task, now: Instant) {
        match task {
            Task::Tick => {
                if self.is_active() {
                    self.stats.seconds = self.elapsed_secs(now);
                    self.tasks.schedule(now + self.options.tick, Task::Tick);
                }
            }
            Task::ClearMismatch => self.selection.clear(),
            Task::RemoveMatched { known, learn } => {
                let dealt = self.window.remove_and_refill(known, learn, &mut self.rng);
                self.selection.clear();
                if let Some((known, learn)) = dealt {
                    self.tasks.schedule(
                        now + self.options.appear,
                        Task::ClearAppearing { known, learn },
                    );
                }
            }
            Task::ClearAppearing { known, learn } => self.window.clear_appearing(known, learn),
        }
    }

    fn evaluate(&mut self, known_idx: usize, learn_idx: usize, now: Instant) -> ClickOutcome {
        self.stats.moves += 1;
        if let Some(id) = self.mismatch_task.take() {
            self.tasks.cancel(id);
        }

        let known = self.window.card(Side::Known, known_idx).cloned();
        let learn = self.window.card(Side::Learn, learn_idx).cloned();
        let (known, learn) = match (known, learn) {
            (Some(k), Some(l)) if k.pair_id == l.pair_id => (k, l),
            _ => {
                debug!(moves = self.stats.moves, "mismatch");
                self.mismatch_task = Some(
                    self.tasks
                        .schedule(now + self.options.mismatch_clear, Task::ClearMismatch),
                );
                return ClickOutcome::Mismatched;
            }
        };

        self.selection.clear();
        self.window.retire(known.uid, learn.uid);
        self.tasks.schedule(
            now + self.options.fade_out,
            Task::RemoveMatched {
                known: known.uid,
                learn: learn.uid,
            },
        );
        self.stats.matches += 1;
        debug!(pair = %known.pair_id, matches = self.stats.matches, "match");

        let finished = self.stats.matches == self.stats.total_pairs;
        if finished {
            self.finalize(now);
        }
        ClickOutcome::Matched { finished }
    }

    fn finalize(&mut self, now: Instant) {
        self.state = RoundState::Finished;
        self.stats.seconds = self.elapsed_secs(now);
        self.tasks.cancel_all();
        self.mismatch_task = None;
        self.window.purge_matched();
        self.selection.clear();
        info!(
            folder = %self.folder,
            moves = self.stats.moves,
            matches = self.stats.matches,
            seconds = self.stats.seconds,
            "round finished"
        );
    }

    fn elapsed_secs(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.started_at).as_secs()
    }
}
