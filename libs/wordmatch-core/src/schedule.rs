//! Deferred work owned by a round.
//!
//! A round never starts free-floating timers. Everything it wants to happen
//! later goes into its [`TaskQueue`], and the host drains due tasks by calling
//! back into the round with the current time. Dropping the round drops the
//! queue, so a task can never fire against a round that has been replaced.

use crate::window::CardUid;
use std::time::Instant;

/// Handle used to cancel a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// Work a round can defer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Recompute elapsed seconds and reschedule.
    Tick,
    /// Drop both selections after a wrong guess.
    ClearMismatch,
    /// Splice a matched pair out of the decks and refill.
    RemoveMatched { known: CardUid, learn: CardUid },
    /// End the appear animation of freshly inserted cards.
    ClearAppearing { known: CardUid, learn: CardUid },
}

#[derive(Debug, Clone)]
struct Scheduled {
    id: TaskId,
    due: Instant,
    task: Task,
}

/// Pending tasks ordered by due time, FIFO among equal times.
#[derive(Debug, Default)]
pub struct TaskQueue {
    next_id: u64,
    pending: Vec<Scheduled>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Instant, task: Task) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled { id, due, task });
        id
    }

    /// Returns false if the task already ran or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Remove and return the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TaskId, Task)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= now)
            .min_by_key(|(_, s)| (s.due, s.id))
            .map(|(idx, _)| idx)?;
        let scheduled = self.pending.remove(idx);
        Some((scheduled.id, scheduled.task))
    }

    /// When the next task becomes due.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|s| s.due).min()
    }
}
