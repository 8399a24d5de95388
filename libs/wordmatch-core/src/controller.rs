//! Game controller: the single owner of the active round.
//!
//! Display code reads projections (`phase`, `stats`, `summary`, `round`) and
//! feeds user input back through `click`, `start_round` and `navigate`.

use crate::audio::CuePlayer;
use crate::error::{Result, RoundError};
use crate::queue::{parse_requested_count, round_rng, RoundQueue};
use crate::round::{ClickOutcome, Round, RoundOptions};
use crate::storage::KeyValueStore;
use crate::store::PairStore;
use crate::types::{
    AudioSettings, FolderMap, GamePhase, NavigationIntent, RoundSummary, SessionStats, Side,
};
use rand::rngs::StdRng;
use std::time::Instant;
use tracing::{debug, info};

/// Folder and requested count of the last started round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSetup {
    pub folder: String,
    pub requested: i64,
}

pub struct GameController<C> {
    cues: C,
    audio: AudioSettings,
    options: RoundOptions,
    round: Option<Round>,
    last_setup: Option<RoundSetup>,
}

impl<C: CuePlayer> GameController<C> {
    pub fn new(cues: C) -> Self {
        Self::with_options(cues, RoundOptions::default())
    }

    pub fn with_options(cues: C, options: RoundOptions) -> Self {
        Self {
            cues,
            audio: AudioSettings::default(),
            options,
            round: None,
            last_setup: None,
        }
    }

    /// Settings take effect at the next round start.
    pub fn set_audio_settings(&mut self, settings: AudioSettings) {
        self.audio = settings.clamped();
    }

    /// Start a round from user input.
    ///
    /// Nothing changes when the configuration is rejected; an active round
    /// keeps running.
    pub fn start_round<S: KeyValueStore>(
        &mut self,
        store: &mut PairStore<S>,
        folders: &FolderMap,
        folder: Option<&str>,
        requested: Option<&str>,
        now: Instant,
    ) -> Result<SessionStats> {
        let requested = parse_requested_count(requested);
        self.start_round_with(store, folders, folder, requested, round_rng(), now)
    }

    /// Start a round with an explicit random source and parsed count.
    pub fn start_round_with<S: KeyValueStore>(
        &mut self,
        store: &mut PairStore<S>,
        folders: &FolderMap,
        folder: Option<&str>,
        requested: i64,
        mut rng: StdRng,
        now: Instant,
    ) -> Result<SessionStats> {
        let name = folder
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(RoundError::NoFolderSelected)?;
        let pairs = folders
            .get(name)
            .ok_or_else(|| RoundError::UnknownFolder(name.to_string()))?;
        if pairs.is_empty() {
            return Err(RoundError::EmptyFolder(name.to_string()));
        }

        let queue = RoundQueue::build(pairs, requested, &mut rng)
            .map_err(|_| RoundError::EmptyFolder(name.to_string()))?;
        let final_count = u32::try_from(queue.len()).unwrap_or(u32::MAX);

        store.set_last_folder(name);
        store.set_last_pair_count(final_count);
        self.cues.apply(self.audio);

        info!(folder = name, requested, final_count, "starting round");
        let round = Round::start(name, queue, self.options, rng, now);
        let stats = round.stats();
        self.round = Some(round);
        self.last_setup = Some(RoundSetup {
            folder: name.to_string(),
            requested,
        });
        Ok(stats)
    }

    /// Start a fresh round with the previous folder and count.
    pub fn play_again<S: KeyValueStore>(
        &mut self,
        store: &mut PairStore<S>,
        folders: &FolderMap,
        now: Instant,
    ) -> Result<SessionStats> {
        let setup = self.last_setup.clone().ok_or(RoundError::NothingToRestart)?;
        self.start_round_with(
            store,
            folders,
            Some(&setup.folder),
            setup.requested,
            round_rng(),
            now,
        )
    }

    /// Forward a click to the round and play the matching cue.
    pub fn click(&mut self, side: Side, index: usize, now: Instant) -> ClickOutcome {
        let Some(round) = self.round.as_mut() else {
            return ClickOutcome::Ignored;
        };
        let outcome = round.click(side, index, now);
        if let Some(cue) = outcome.cue() {
            if let Err(e) = self.cues.play(cue) {
                debug!(?cue, error = %e, "cue playback failed");
            }
        }
        outcome
    }

    /// Run the round's due tasks.
    pub fn advance(&mut self, now: Instant) -> usize {
        self.round.as_mut().map_or(0, |round| round.advance(now))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.round.as_ref().and_then(Round::next_deadline)
    }

    /// Leave the game view. The round and its pending tasks are discarded.
    pub fn navigate(&mut self, intent: NavigationIntent) -> NavigationIntent {
        if self.round.take().is_some() {
            debug!(?intent, "round torn down");
        }
        intent
    }

    pub fn phase(&self) -> GamePhase {
        match &self.round {
            None => GamePhase::Idle,
            Some(round) if round.is_finished() => GamePhase::Finished,
            Some(_) => GamePhase::Active,
        }
    }

    /// Current counters; zeroed while idle.
    pub fn stats(&self) -> SessionStats {
        self.round.as_ref().map(Round::stats).unwrap_or_default()
    }

    pub fn summary(&self) -> Option<RoundSummary> {
        self.round.as_ref().and_then(Round::summary)
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn last_setup(&self) -> Option<&RoundSetup> {
        self.last_setup.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Cue;
    use crate::error::CueError;
    use crate::storage::MemoryStore;
    use crate::store::DEFAULT_FOLDER;
    use rand::SeedableRng;

    #[derive(Default)]
    struct RecordingCues {
        played: Vec<Cue>,
        volume: Option<f32>,
        muted: Option<bool>,
        fail: bool,
    }

    impl CuePlayer for RecordingCues {
        fn play(&mut self, cue: Cue) -> std::result::Result<(), CueError> {
            self.played.push(cue);
            if self.fail {
                return Err(CueError::Rejected("autoplay blocked".into()));
            }
            Ok(())
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = Some(volume);
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = Some(muted);
        }
    }

    fn setup() -> (PairStore<MemoryStore>, FolderMap) {
        let mut store = PairStore::new(MemoryStore::new());
        let folders = store.ensure_defaults(FolderMap::new());
        (store, folders)
    }

    #[test]
    fn rejected_configuration_leaves_state_alone() {
        let (mut store, mut folders) = setup();
        folders.insert("Empty".into(), vec![]);
        let mut game = GameController::new(RecordingCues::default());
        let now = Instant::now();

        assert_eq!(
            game.start_round(&mut store, &folders, None, Some("3"), now),
            Err(RoundError::NoFolderSelected)
        );
        assert_eq!(
            game.start_round(&mut store, &folders, Some("Nope"), Some("3"), now),
            Err(RoundError::UnknownFolder("Nope".into()))
        );
        assert_eq!(
            game.start_round(&mut store, &folders, Some("Empty"), Some("3"), now),
            Err(RoundError::EmptyFolder("Empty".into()))
        );
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(store.last_folder(), None);
        assert_eq!(game.cues.volume, None);
    }

    #[test]
    fn rejected_restart_keeps_active_round() {
        let (mut store, folders) = setup();
        let mut game = GameController::new(RecordingCues::default());
        let now = Instant::now();
        game.start_round(&mut store, &folders, Some(DEFAULT_FOLDER), Some("3"), now)
            .unwrap();

        assert!(game
            .start_round(&mut store, &folders, Some("Nope"), None, now)
            .is_err());
        assert_eq!(game.phase(), GamePhase::Active);
        assert_eq!(game.stats().total_pairs, 3);
    }

    #[test]
    fn start_persists_last_used_and_pushes_audio() {
        let (mut store, folders) = setup();
        let mut game = GameController::new(RecordingCues::default());
        game.set_audio_settings(AudioSettings { muted: true, volume: 0.4 });

        let stats = game
            .start_round(&mut store, &folders, Some(DEFAULT_FOLDER), Some("100"), Instant::now())
            .unwrap();
        assert_eq!(stats.total_pairs, 4);
        assert_eq!(store.last_folder().as_deref(), Some(DEFAULT_FOLDER));
        assert_eq!(store.last_pair_count(), Some(4));
        assert_eq!(game.cues.muted, Some(true));
        assert_eq!(game.cues.volume, Some(0.4));
    }

    #[test]
    fn cue_failures_do_not_interrupt_play() {
        let (mut store, folders) = setup();
        let cues = RecordingCues {
            fail: true,
            ..RecordingCues::default()
        };
        let mut game = GameController::new(cues);
        let now = Instant::now();
        game.start_round_with(
            &mut store,
            &folders,
            Some(DEFAULT_FOLDER),
            2,
            StdRng::seed_from_u64(1),
            now,
        )
        .unwrap();

        let round = game.round().unwrap();
        let pair_id = round.window().deck(Side::Known)[0].pair_id.clone();
        let learn = round
            .window()
            .deck(Side::Learn)
            .iter()
            .position(|c| c.pair_id == pair_id)
            .unwrap();

        game.click(Side::Known, 0, now);
        let outcome = game.click(Side::Learn, learn, now);
        assert_eq!(outcome, ClickOutcome::Matched { finished: false });
        assert_eq!(game.cues.played, vec![Cue::Success]);
        assert_eq!(game.stats().matches, 1);
    }

    #[test]
    fn navigate_tears_down_round() {
        let (mut store, folders) = setup();
        let mut game = GameController::new(RecordingCues::default());
        let now = Instant::now();
        game.start_round(&mut store, &folders, Some(DEFAULT_FOLDER), None, now)
            .unwrap();
        assert!(game.next_deadline().is_some());

        assert_eq!(game.navigate(NavigationIntent::EditWords), NavigationIntent::EditWords);
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.next_deadline(), None);
        assert_eq!(game.stats(), SessionStats::default());
        assert_eq!(game.click(Side::Known, 0, now), ClickOutcome::Ignored);
        assert_eq!(game.advance(now + std::time::Duration::from_secs(5)), 0);
    }

    #[test]
    fn play_again_reuses_setup() {
        let (mut store, folders) = setup();
        let mut game = GameController::new(RecordingCues::default());
        let now = Instant::now();
        assert_eq!(
            game.play_again(&mut store, &folders, now),
            Err(RoundError::NothingToRestart)
        );

        game.start_round(&mut store, &folders, Some(DEFAULT_FOLDER), Some("3"), now)
            .unwrap();
        game.navigate(NavigationIntent::Menu);
        let stats = game.play_again(&mut store, &folders, now).unwrap();
        assert_eq!(stats.total_pairs, 3);
        assert_eq!(game.phase(), GamePhase::Active);
    }
}
