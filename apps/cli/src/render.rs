//! Plain-text rendering of the game screen.

use wordmatch_core::{CardView, CuePlayer, GameController, GamePhase, Round, RoundSummary, Side};

const COLUMN_WIDTH: usize = 24;

/// Whole screen for the controller's current phase.
pub fn screen<C: CuePlayer>(game: &GameController<C>) -> String {
    match (game.phase(), game.round()) {
        (GamePhase::Finished, Some(round)) => match round.summary() {
            Some(summary) => finished(round.folder(), &summary),
            None => board(round),
        },
        (_, Some(round)) => board(round),
        _ => String::from("No round in progress.\n"),
    }
}

/// Status line plus both card columns.
fn board(round: &Round) -> String {
    let stats = round.stats();
    let known = round.cards(Side::Known);
    let learn = round.cards(Side::Learn);

    let mut lines = vec![
        format!(
            "{}   Moves: {}   Pairs: {}/{}   Time: {}",
            round.folder(),
            stats.moves,
            stats.matches,
            stats.total_pairs,
            clock(stats.seconds)
        ),
        String::new(),
        format!("    {:<COLUMN_WIDTH$}    {}", "Known (k)", "Learn (l)"),
    ];
    for row in 0..known.len().max(learn.len()) {
        let left = known.get(row).map(card_label).unwrap_or_default();
        let right = learn.get(row).map(card_label).unwrap_or_default();
        lines.push(format!(
            "{:>2}  {:<COLUMN_WIDTH$}{:>2}  {}",
            row + 1,
            left,
            row + 1,
            right
        ));
    }
    lines.push(String::new());
    lines.push(String::from("k<n> / l<n> pick a card, q back to menu"));
    text(lines)
}

/// End-of-round summary with the follow-up actions.
fn finished(folder: &str, summary: &RoundSummary) -> String {
    text(vec![
        format!("Round complete! ({folder})"),
        String::new(),
        format!(
            "  Pairs found  {}/{}",
            summary.pairs_found, summary.total_pairs
        ),
        format!("  Accuracy     {}%", summary.accuracy),
        format!("  Time         {}", summary.format_time()),
        format!("  Moves        {}", summary.moves),
        String::new(),
        String::from("again: play again   menu: back to menu   edit: edit words"),
    ])
}

fn text(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn card_label(card: &CardView) -> String {
    if card.fading || card.matched {
        format!("  {} ✓", card.word)
    } else if card.selected {
        format!("[ {} ]", card.word)
    } else if card.appearing {
        format!("+ {}", card.word)
    } else {
        format!("  {}", card.word)
    }
}

fn clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
