//! Visible window: the bounded decks of clickable cards on each side.
//!
//! Each side shows at most `max_visible` cards. A matched pair is first
//! retired (unclickable, fading) and later removed, at which point the next
//! queued pair is dealt into both decks and both decks are reshuffled.

use crate::queue::{QueuedPair, RoundQueue};
use crate::types::{PairId, Side};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;

/// Default number of cards shown per side.
pub const MAX_VISIBLE: usize = 5;

/// Identity of one card instance, unique within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CardUid(pub u64);

/// One clickable card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleCard {
    pub uid: CardUid,
    pub word: String,
    pub pair_id: PairId,
}

#[derive(Debug)]
pub struct VisibleWindow {
    queue: RoundQueue,
    max_visible: usize,
    known: Vec<VisibleCard>,
    learn: Vec<VisibleCard>,
    next_uid: u64,
    matched: HashSet<CardUid>,
    // presentation only
    fading: HashSet<CardUid>,
    appearing: HashSet<CardUid>,
}

impl VisibleWindow {
    /// Deal the first `max_visible` queued pairs and shuffle each side independently.
    pub fn fill<R: Rng + ?Sized>(mut queue: RoundQueue, max_visible: usize, rng: &mut R) -> Self {
        let max_visible = max_visible.max(1);
        let initial = queue.take(max_visible);

        let mut window = Self {
            queue,
            max_visible,
            known: Vec::with_capacity(max_visible),
            learn: Vec::with_capacity(max_visible),
            next_uid: 0,
            matched: HashSet::new(),
            fading: HashSet::new(),
            appearing: HashSet::new(),
        };
        for queued in initial {
            window.deal(queued);
        }
        window.shuffle_decks(rng);
        window
    }

    pub fn deck(&self, side: Side) -> &[VisibleCard] {
        match side {
            Side::Known => &self.known,
            Side::Learn => &self.learn,
        }
    }

    pub fn card(&self, side: Side, index: usize) -> Option<&VisibleCard> {
        self.deck(side).get(index)
    }

    /// Matched and waiting for removal.
    pub fn is_matched(&self, uid: CardUid) -> bool {
        self.matched.contains(&uid)
    }

    pub fn is_fading(&self, uid: CardUid) -> bool {
        self.fading.contains(&uid)
    }

    pub fn is_appearing(&self, uid: CardUid) -> bool {
        self.appearing.contains(&uid)
    }

    /// Cards on `side` that can still be matched.
    pub fn live_count(&self, side: Side) -> usize {
        self.deck(side)
            .iter()
            .filter(|card| !self.matched.contains(&card.uid))
            .count()
    }

    /// Pairs of the round not matched yet, visible or queued.
    pub fn remaining(&self) -> usize {
        self.live_count(Side::Known) + self.queue.remaining()
    }

    /// Mark a matched pair as unclickable and start its fade.
    pub fn retire(&mut self, known: CardUid, learn: CardUid) {
        for uid in [known, learn] {
            self.matched.insert(uid);
            self.fading.insert(uid);
            self.appearing.remove(&uid);
        }
    }

    /// Splice a retired pair out and deal the next queued pair, if any.
    ///
    /// Returns the uids of the newly dealt cards. Both decks are reshuffled
    /// when a pair is dealt; otherwise they just shrink.
    pub fn remove_and_refill<R: Rng + ?Sized>(
        &mut self,
        known: CardUid,
        learn: CardUid,
        rng: &mut R,
    ) -> Option<(CardUid, CardUid)> {
        self.remove(known, learn);

        if self.known.len() >= self.max_visible {
            return None;
        }
        let next = self.queue.next_pair()?;
        let uids = self.deal(next);
        self.appearing.insert(uids.0);
        self.appearing.insert(uids.1);
        self.shuffle_decks(rng);
        Some(uids)
    }

    pub fn clear_appearing(&mut self, known: CardUid, learn: CardUid) {
        self.appearing.remove(&known);
        self.appearing.remove(&learn);
    }

    /// Drop every retired card immediately, without dealing replacements.
    pub fn purge_matched(&mut self) {
        let matched = std::mem::take(&mut self.matched);
        self.known.retain(|card| !matched.contains(&card.uid));
        self.learn.retain(|card| !matched.contains(&card.uid));
        self.fading.clear();
        self.appearing.clear();
    }

    fn remove(&mut self, known: CardUid, learn: CardUid) {
        self.known.retain(|card| card.uid != known);
        self.learn.retain(|card| card.uid != learn);
        for uid in [known, learn] {
            self.matched.remove(&uid);
            self.fading.remove(&uid);
            self.appearing.remove(&uid);
        }
    }

    fn deal(&mut self, queued: QueuedPair) -> (CardUid, CardUid) {
        let known = VisibleCard {
            uid: self.alloc_uid(),
            word: queued.pair.known,
            pair_id: queued.pair_id.clone(),
        };
        let learn = VisibleCard {
            uid: self.alloc_uid(),
            word: queued.pair.learn,
            pair_id: queued.pair_id,
        };
        let uids = (known.uid, learn.uid);
        self.known.push(known);
        self.learn.push(learn);
        uids
    }

    fn alloc_uid(&mut self) -> CardUid {
        let uid = CardUid(self.next_uid);
        self.next_uid += 1;
        uid
    }

    fn shuffle_decks<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.known.shuffle(rng);
        self.learn.shuffle(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WordPair;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn queue_of(n: usize) -> RoundQueue {
        RoundQueue::from_pairs(
            (0..n)
                .map(|i| WordPair::new(format!("k{i}"), format!("l{i}")))
                .collect(),
        )
    }

    fn uids_of(window: &VisibleWindow, side: Side, pair_id: &PairId) -> CardUid {
        window
            .deck(side)
            .iter()
            .find(|card| &card.pair_id == pair_id)
            .map(|card| card.uid)
            .unwrap()
    }

    #[test]
    fn fill_deals_min_of_bound_and_queue() {
        let mut rng = StdRng::seed_from_u64(3);
        let window = VisibleWindow::fill(queue_of(8), MAX_VISIBLE, &mut rng);
        assert_eq!(window.deck(Side::Known).len(), 5);
        assert_eq!(window.deck(Side::Learn).len(), 5);
        assert_eq!(window.queue.remaining(), 3);

        let small = VisibleWindow::fill(queue_of(2), MAX_VISIBLE, &mut rng);
        assert_eq!(small.deck(Side::Known).len(), 2);
        assert_eq!(small.queue.remaining(), 0);
    }

    #[test]
    fn both_decks_hold_the_same_pairs() {
        let mut rng = StdRng::seed_from_u64(11);
        let window = VisibleWindow::fill(queue_of(5), MAX_VISIBLE, &mut rng);
        let mut known: Vec<_> = window.deck(Side::Known).iter().map(|c| c.pair_id.clone()).collect();
        let mut learn: Vec<_> = window.deck(Side::Learn).iter().map(|c| c.pair_id.clone()).collect();
        known.sort();
        learn.sort();
        assert_eq!(known, learn);
    }

    #[test]
    fn sides_are_shuffled_independently() {
        let mut rng = StdRng::seed_from_u64(5);
        let differs = (0..50).any(|_| {
            let window = VisibleWindow::fill(queue_of(5), MAX_VISIBLE, &mut rng);
            let known: Vec<_> = window.deck(Side::Known).iter().map(|c| &c.pair_id).collect();
            let learn: Vec<_> = window.deck(Side::Learn).iter().map(|c| &c.pair_id).collect();
            known != learn
        });
        assert!(differs);
    }

    #[test]
    fn refill_deals_next_pair_with_fresh_uids() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut window = VisibleWindow::fill(queue_of(7), MAX_VISIBLE, &mut rng);
        let target = window.deck(Side::Known)[0].pair_id.clone();
        let known = uids_of(&window, Side::Known, &target);
        let learn = uids_of(&window, Side::Learn, &target);

        window.retire(known, learn);
        assert!(window.is_matched(known));
        assert!(window.is_fading(learn));
        assert_eq!(window.live_count(Side::Known), 4);
        assert_eq!(window.deck(Side::Known).len(), 5);

        let (new_known, new_learn) = window.remove_and_refill(known, learn, &mut rng).unwrap();
        assert_eq!(window.deck(Side::Known).len(), 5);
        assert_eq!(window.deck(Side::Learn).len(), 5);
        assert!(window.deck(Side::Known).iter().all(|c| c.pair_id != target));
        assert!(new_known != known && new_known != learn && new_learn != known);
        assert!(window.is_appearing(new_known));
        assert!(window.is_appearing(new_learn));
        assert!(!window.is_fading(known));

        window.clear_appearing(new_known, new_learn);
        assert!(!window.is_appearing(new_known));
        assert_eq!(window.remaining(), 6);
    }

    #[test]
    fn exhausted_queue_shrinks_decks() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut window = VisibleWindow::fill(queue_of(3), MAX_VISIBLE, &mut rng);
        let target = window.deck(Side::Learn)[1].pair_id.clone();
        let known = uids_of(&window, Side::Known, &target);
        let learn = uids_of(&window, Side::Learn, &target);

        window.retire(known, learn);
        assert_eq!(window.remove_and_refill(known, learn, &mut rng), None);
        assert_eq!(window.deck(Side::Known).len(), 2);
        assert_eq!(window.deck(Side::Learn).len(), 2);
        assert_eq!(window.remaining(), 2);
    }

    #[test]
    fn purge_drops_retired_cards() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut window = VisibleWindow::fill(queue_of(2), MAX_VISIBLE, &mut rng);
        let target = window.deck(Side::Known)[0].pair_id.clone();
        let known = uids_of(&window, Side::Known, &target);
        let learn = uids_of(&window, Side::Learn, &target);

        window.retire(known, learn);
        window.purge_matched();
        assert_eq!(window.deck(Side::Known).len(), 1);
        assert!(!window.is_fading(known));
        assert!(!window.is_matched(known));
    }

    #[test]
    fn uids_are_never_reused() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut window = VisibleWindow::fill(queue_of(12), MAX_VISIBLE, &mut rng);
        let mut seen = HashSet::new();
        for card in window.deck(Side::Known).iter().chain(window.deck(Side::Learn)) {
            assert!(seen.insert(card.uid));
        }

        while window.queue.remaining() > 0 {
            let target = window.deck(Side::Known)[0].pair_id.clone();
            let known = uids_of(&window, Side::Known, &target);
            let learn = uids_of(&window, Side::Learn, &target);
            window.retire(known, learn);
            let (a, b) = window.remove_and_refill(known, learn, &mut rng).unwrap();
            assert!(seen.insert(a));
            assert!(seen.insert(b));
            assert!(window.deck(Side::Known).len() <= MAX_VISIBLE);
        }
    }
}
