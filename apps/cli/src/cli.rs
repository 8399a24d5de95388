//! CLI argument definitions.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use wordmatch_core::WordPair;

#[derive(Debug, Parser)]
#[command(
    name = "wordmatch",
    version,
    about = "Match words with their translations, from folders you build yourself"
)]
pub struct Cli {
    /// Database file (default: <data dir>/wordmatch/wordmatch.db).
    #[arg(long, env = "WORDMATCH_DB", value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print command results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Defaults to `play`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List folders and their pair counts.
    Folders,

    /// Show the pairs stored in a folder.
    Show { folder: String },

    /// Create an empty folder.
    CreateFolder { name: String },

    /// Add pairs to a folder, skipping ones it already has.
    Add {
        folder: String,

        /// Pairs written as `known=learn`.
        #[arg(value_name = "KNOWN=LEARN", value_parser = parse_pair, required = true)]
        pairs: Vec<WordPair>,
    },

    /// Play a round.
    Play {
        /// Folder to play (default: the last played one).
        #[arg(long, short)]
        folder: Option<String>,

        /// Number of pairs; clamped to what the folder holds.
        #[arg(long, short = 'n', allow_hyphen_values = true)]
        pairs: Option<String>,
    },

    /// Show or change audio settings.
    Settings {
        #[arg(long)]
        muted: Option<bool>,

        /// Volume between 0.0 and 1.0.
        #[arg(long)]
        volume: Option<f32>,
    },

    /// Delete every folder and remembered setting.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

/// Parse a `known=learn` argument.
pub fn parse_pair(raw: &str) -> Result<WordPair, String> {
    let (known, learn) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KNOWN=LEARN, got {raw:?}"))?;
    let pair = WordPair::new(known.trim(), learn.trim());
    if pair.known.is_empty() || pair.learn.is_empty() {
        return Err(format!("both words are required in {raw:?}"));
    }
    Ok(pair)
}
