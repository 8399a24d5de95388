//! Interactive round loop on stdin/stdout.

use crate::audio::BellCues;
use crate::commands;
use crate::render;
use crate::state::AppState;
use std::io::Write;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, trace};
use wordmatch_core::{CuePlayer, GameController, GamePhase, NavigationIntent, Side};

/// Wake-up interval when no task is scheduled.
const IDLE_WAKE: Duration = Duration::from_secs(60);

const HELP: &str = "k<n>: pick known card n   l<n>: pick learn card n   \
                    again: new round (after finishing)   q/menu: leave   edit: edit words";

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Click(Side, usize),
    Again,
    Menu,
    Edit,
    Help,
    Empty,
    Unknown(String),
}

/// Parse a line such as `k3`, `l 2`, `again` or `q`. Card numbers are 1-based.
pub fn parse_input(line: &str) -> Input {
    let text = line.trim().to_lowercase();
    match text.as_str() {
        "" => return Input::Empty,
        "again" | "a" | "restart" => return Input::Again,
        "q" | "menu" | "quit" => return Input::Menu,
        "edit" | "e" => return Input::Edit,
        "?" | "h" | "help" => return Input::Help,
        _ => {}
    }

    let side = match text.chars().next() {
        Some('k') => Side::Known,
        Some('l') => Side::Learn,
        _ => return Input::Unknown(line.trim().to_string()),
    };
    match text[1..].trim().parse::<usize>() {
        Ok(n) if n > 0 => Input::Click(side, n - 1),
        _ => Input::Unknown(line.trim().to_string()),
    }
}

/// What the loop does after one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Continue(Option<String>),
    Leave(NavigationIntent),
}

/// Apply one line of input to the game. Restarting is only offered once the
/// round has finished.
fn handle_input<C: CuePlayer>(
    game: &mut GameController<C>,
    state: &mut AppState,
    input: Input,
    now: Instant,
) -> Step {
    let notice = match input {
        Input::Click(side, index) => {
            let outcome = game.click(side, index, now);
            trace!(?side, index, ?outcome, "click");
            None
        }
        Input::Again if game.phase() != GamePhase::Finished => {
            Some(String::from("round in progress; finish it or press q for the menu"))
        }
        Input::Again => game
            .play_again(&mut state.store, &state.folders, now)
            .err()
            .map(|e| e.to_string()),
        Input::Menu => return Step::Leave(NavigationIntent::Menu),
        Input::Edit => return Step::Leave(NavigationIntent::EditWords),
        Input::Help => Some(HELP.to_string()),
        Input::Empty => None,
        Input::Unknown(text) => Some(format!("unknown input {text:?}, type ? for help")),
    };
    Step::Continue(notice)
}

/// How the player left the game screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundExit {
    pub intent: NavigationIntent,
    pub folder: Option<String>,
}

/// Redraws only when the rendered text changes.
#[derive(Default)]
struct Screen {
    last: String,
    notice: Option<String>,
}

impl Screen {
    fn draw<C: CuePlayer, W: Write>(
        &mut self,
        game: &GameController<C>,
        out: &mut W,
    ) -> std::io::Result<()> {
        let mut frame = render::screen(game);
        if let Some(notice) = &self.notice {
            frame.push('\n');
            frame.push_str(notice);
            frame.push('\n');
        }
        if frame == self.last {
            return Ok(());
        }
        write!(out, "\x1b[2J\x1b[H{frame}> ")?;
        out.flush()?;
        self.last = frame;
        Ok(())
    }
}

/// Run rounds until the player leaves. Returns `None` if no round could start.
pub async fn play(
    state: &mut AppState,
    folder: Option<String>,
    pairs: Option<String>,
) -> anyhow::Result<Option<RoundExit>> {
    let settings = commands::get_audio_settings(state)?;
    let defaults = commands::last_round_setup(state);
    let folder = folder.or(defaults.folder);
    let pairs = pairs.unwrap_or_else(|| defaults.pair_count.to_string());

    let mut game = GameController::new(BellCues::stderr());
    game.set_audio_settings(settings);
    if let Err(e) = game.start_round(
        &mut state.store,
        &state.folders,
        folder.as_deref(),
        Some(&pairs),
        Instant::now(),
    ) {
        println!("{e}");
        return Ok(None);
    }

    let mut out = std::io::stdout();
    let mut screen = Screen::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    screen.draw(&game, &mut out)?;

    loop {
        let wake = game
            .next_deadline()
            .unwrap_or_else(|| Instant::now() + IDLE_WAKE);

        tokio::select! {
            line = lines.next_line() => {
                screen.notice = None;
                let Some(line) = line? else {
                    debug!("stdin closed");
                    return Ok(Some(leave(&mut game, NavigationIntent::Menu)));
                };
                match handle_input(&mut game, state, parse_input(&line), Instant::now()) {
                    Step::Continue(notice) => screen.notice = notice,
                    Step::Leave(intent) => return Ok(Some(leave(&mut game, intent))),
                }
            }
            _ = tokio::time::sleep_until(tokio::time::Instant::from_std(wake)) => {
                game.advance(Instant::now());
            }
        }

        screen.draw(&game, &mut out)?;
    }
}

fn leave<C: CuePlayer>(
    game: &mut GameController<C>,
    intent: NavigationIntent,
) -> RoundExit {
    let folder = game.last_setup().map(|setup| setup.folder.clone());
    RoundExit {
        intent: game.navigate(intent),
        folder,
    }
}
