//! End-to-end rounds driven through the game controller.

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};
use wordmatch_core::store::DEFAULT_FOLDER;
use wordmatch_core::{
    ClickOutcome, FolderMap, GameController, GamePhase, MemoryStore, PairStore, SessionStats,
    Side, SilentCues, WordPair, MAX_VISIBLE,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn seeded_store() -> (PairStore<MemoryStore>, FolderMap) {
    let mut store = PairStore::new(MemoryStore::new());
    let loaded = store.load();
    let folders = store.ensure_defaults(loaded);
    (store, folders)
}

fn start(
    game: &mut GameController<SilentCues>,
    store: &mut PairStore<MemoryStore>,
    folders: &FolderMap,
    folder: &str,
    requested: i64,
    now: Instant,
) -> SessionStats {
    game.start_round_with(
        store,
        folders,
        Some(folder),
        requested,
        StdRng::seed_from_u64(2024),
        now,
    )
    .unwrap()
}

/// Deck indices of a live known card and its partner.
fn find_match(game: &GameController<SilentCues>) -> (usize, usize) {
    let round = game.round().unwrap();
    let window = round.window();
    let known = window
        .deck(Side::Known)
        .iter()
        .position(|card| !window.is_matched(card.uid))
        .unwrap();
    let pair_id = &window.deck(Side::Known)[known].pair_id;
    let learn = window
        .deck(Side::Learn)
        .iter()
        .position(|card| &card.pair_id == pair_id)
        .unwrap();
    (known, learn)
}

fn find_mismatch(game: &GameController<SilentCues>) -> (usize, usize) {
    let (known, learn) = find_match(game);
    let len = game.round().unwrap().window().deck(Side::Learn).len();
    let other = (0..len).find(|&idx| idx != learn).unwrap();
    (known, other)
}

#[test]
fn two_pair_round_from_example_folder() {
    let (mut store, folders) = seeded_store();
    assert_eq!(folders[DEFAULT_FOLDER].len(), 4);

    let mut game = GameController::new(SilentCues);
    let t0 = Instant::now();
    let stats = start(&mut game, &mut store, &folders, DEFAULT_FOLDER, 2, t0);
    assert_eq!(stats.total_pairs, 2);

    let round = game.round().unwrap();
    assert!(round.window().deck(Side::Known).len() <= 2);
    assert!(round.window().deck(Side::Learn).len() <= 2);

    for step in 0..2 {
        let now = t0 + ms(1000 * (step + 1));
        let (known, learn) = find_match(&game);
        assert_eq!(game.click(Side::Known, known, now), ClickOutcome::Selected);
        let outcome = game.click(Side::Learn, learn, now);
        assert!(matches!(outcome, ClickOutcome::Matched { .. }));
        game.advance(now + ms(500));
    }

    assert_eq!(game.phase(), GamePhase::Finished);
    let stats = game.stats();
    assert_eq!(
        (stats.moves, stats.matches, stats.total_pairs),
        (2, 2, 2)
    );
    assert_eq!(game.summary().unwrap().accuracy, 100);
}

#[test]
fn oversized_request_clamps_to_folder_size() {
    let (mut store, folders) = seeded_store();
    let mut game = GameController::new(SilentCues);
    let stats = game
        .start_round(&mut store, &folders, Some(DEFAULT_FOLDER), Some("100"), Instant::now())
        .unwrap();
    assert_eq!(stats.total_pairs, 4);
    assert_eq!(store.last_pair_count(), Some(4));
}

#[test]
fn requested_count_always_clamped() {
    let (mut store, folders) = seeded_store();
    let mut game = GameController::new(SilentCues);
    let cases = [
        (Some("-5"), 2),
        (Some("0"), 2),
        (Some("two"), 2),
        (None, 2),
        (Some("3"), 3),
        (Some("4"), 4),
        (Some("99999999999"), 4),
        (Some("99999999999999999999"), 4),
        (Some("-99999999999999999999"), 2),
    ];
    for (input, expected) in cases {
        let stats = game
            .start_round(&mut store, &folders, Some(DEFAULT_FOLDER), input, Instant::now())
            .unwrap();
        assert_eq!(stats.total_pairs, expected, "input {input:?}");
    }
}

#[test]
fn wrong_guesses_count_moves_and_clear_later() {
    let (mut store, folders) = seeded_store();
    let mut game = GameController::new(SilentCues);
    let t0 = Instant::now();
    start(&mut game, &mut store, &folders, DEFAULT_FOLDER, 4, t0);

    let (known, wrong) = find_mismatch(&game);
    game.click(Side::Known, known, t0);
    assert_eq!(game.click(Side::Learn, wrong, t0), ClickOutcome::Mismatched);
    game.advance(t0 + ms(600));
    assert_eq!(game.round().unwrap().selection().known, None);

    let t1 = t0 + ms(1000);
    let (known, wrong) = find_mismatch(&game);
    game.click(Side::Learn, wrong, t1);
    assert_eq!(game.click(Side::Known, known, t1), ClickOutcome::Mismatched);

    let selection = game.round().unwrap().selection();
    assert_eq!((selection.known, selection.learn), (Some(known), Some(wrong)));
    assert_eq!(game.stats().moves, 2);
    assert_eq!(game.stats().matches, 0);

    game.advance(t1 + ms(600));
    let selection = game.round().unwrap().selection();
    assert_eq!((selection.known, selection.learn), (None, None));
}

#[test]
fn window_tracks_remaining_pairs_through_a_long_round() {
    let mut store = PairStore::new(MemoryStore::new());
    let mut folders = FolderMap::new();
    let pairs: Vec<_> = (0..12)
        .map(|i| WordPair::new(format!("word{i}"), format!("słowo{i}")))
        .collect();
    store.merge_pairs_into_folder(&mut folders, "Big", &pairs);

    let mut game = GameController::new(SilentCues);
    let mut now = Instant::now();
    start(&mut game, &mut store, &folders, "Big", 12, now);

    let mut remaining = 12usize;
    loop {
        let round = game.round().unwrap();
        for side in [Side::Known, Side::Learn] {
            let deck = round.window().deck(side);
            assert!(deck.len() <= MAX_VISIBLE);
            assert_eq!(round.window().live_count(side), remaining.min(MAX_VISIBLE));
        }
        if remaining == 0 {
            break;
        }

        let (known, learn) = find_match(&game);
        now += ms(300);
        game.click(Side::Known, known, now);
        let outcome = game.click(Side::Learn, learn, now);
        remaining -= 1;
        assert_eq!(outcome, ClickOutcome::Matched { finished: remaining == 0 });

        now += ms(500);
        game.advance(now);
    }

    let stats = game.stats();
    assert_eq!(stats.moves, 12);
    assert_eq!(stats.matches, 12);
    assert_eq!(game.phase(), GamePhase::Finished);
}

#[test]
fn finished_round_ignores_further_input() {
    let (mut store, folders) = seeded_store();
    let mut game = GameController::new(SilentCues);
    let t0 = Instant::now();
    start(&mut game, &mut store, &folders, DEFAULT_FOLDER, 2, t0);

    let mut finishes = 0;
    for _ in 0..2 {
        let (known, learn) = find_match(&game);
        game.click(Side::Known, known, t0);
        if game.click(Side::Learn, learn, t0) == (ClickOutcome::Matched { finished: true }) {
            finishes += 1;
        }
    }
    assert_eq!(finishes, 1);

    let frozen = game.stats();
    for idx in 0..5 {
        assert_eq!(game.click(Side::Known, idx, t0 + ms(100)), ClickOutcome::Ignored);
        assert_eq!(game.click(Side::Learn, idx, t0 + ms(100)), ClickOutcome::Ignored);
    }
    game.advance(t0 + ms(60_000));
    assert_eq!(game.stats(), frozen);
}

#[test]
fn restart_discards_pending_work_of_previous_round() {
    let (mut store, folders) = seeded_store();
    let mut game = GameController::new(SilentCues);
    let t0 = Instant::now();
    start(&mut game, &mut store, &folders, DEFAULT_FOLDER, 4, t0);

    let (known, wrong) = find_mismatch(&game);
    game.click(Side::Known, known, t0);
    game.click(Side::Learn, wrong, t0);

    let t1 = t0 + ms(100);
    start(&mut game, &mut store, &folders, DEFAULT_FOLDER, 4, t1);
    game.click(Side::Known, 0, t1 + ms(50));

    // the old mismatch clear was due at 600 ms and must not touch the new round
    game.advance(t0 + ms(700));
    assert_eq!(game.round().unwrap().selection().known, Some(0));
    assert_eq!(game.stats().moves, 0);
}
