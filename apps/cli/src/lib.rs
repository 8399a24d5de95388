pub mod audio;
pub mod cli;
pub mod commands;
pub mod db;
pub mod logging;
pub mod play;
pub mod render;
pub mod state;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use db::SqliteRepository;
use play::RoundExit;
use serde::Serialize;
use state::AppState;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::warn;
use wordmatch_core::NavigationIntent;

fn get_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordmatch")
        .join("wordmatch.db")
}

/// Open the database, falling back to an in-memory one so play still works.
fn open_repository(path: &Path) -> anyhow::Result<SqliteRepository> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    match SqliteRepository::open(path) {
        Ok(repo) => Ok(repo),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "database unavailable, nothing will be saved");
            SqliteRepository::open_in_memory().context("failed to open in-memory database")
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let db_path = cli.db.clone().unwrap_or_else(get_db_path);
    let repository = open_repository(&db_path)?;
    let mut state = AppState::new(repository);

    let json = cli.json;
    match cli.command.unwrap_or(Command::Play {
        folder: None,
        pairs: None,
    }) {
        Command::Folders => {
            let folders = commands::list_folders(&state);
            emit(json, &folders, || {
                folders
                    .iter()
                    .map(|f| format!("{} ({} pairs)", f.name, f.pair_count))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Command::Show { folder } => {
            let pairs = commands::show_folder(&state, &folder)?;
            emit(json, &pairs, || {
                pairs
                    .iter()
                    .map(|p| format!("{} = {}", p.known, p.learn))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Command::CreateFolder { name } => {
            let folder = commands::create_folder(&mut state, &name)?;
            emit(json, &folder, || {
                format!("Folder {:?} is ready ({} pairs).", folder.name, folder.pair_count)
            })?;
        }
        Command::Add { folder, pairs } => {
            let result = commands::add_pairs(&mut state, &folder, &pairs)?;
            emit(json, &result, || {
                format!("Added {} new pairs to {:?}.", result.added, folder.trim())
            })?;
        }
        Command::Settings { muted, volume } => {
            let settings = if muted.is_none() && volume.is_none() {
                commands::get_audio_settings(&state)?
            } else {
                commands::save_audio_settings(&state, muted, volume)?
            };
            emit(json, &settings, || {
                format!(
                    "muted: {}\nvolume: {:.2}",
                    settings.muted, settings.volume
                )
            })?;
        }
        Command::Reset { yes } => {
            if yes || confirm("Delete all folders and saved settings?")? {
                let folders = commands::reset_storage(&mut state);
                emit(json, &folders, || String::from("Storage cleared."))?;
            } else {
                let folders = commands::list_folders(&state);
                emit(json, &folders, || String::from("Nothing deleted."))?;
            }
        }
        Command::Play { folder, pairs } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let exit = runtime.block_on(play::play(&mut state, folder, pairs))?;
            if let Some(exit) = exit {
                after_round(&state, &exit);
            }
        }
    }

    Ok(())
}

/// Print a value as JSON or as text.
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn after_round(state: &AppState, exit: &RoundExit) {
    match exit.intent {
        NavigationIntent::Menu => {
            println!();
            for folder in commands::list_folders(state) {
                println!("{} ({} pairs)", folder.name, folder.pair_count);
            }
            println!("\nRun `wordmatch play --folder <name>` to start another round.");
        }
        NavigationIntent::EditWords => {
            let folder = exit.folder.as_deref().unwrap_or_default();
            println!();
            if let Ok(pairs) = commands::show_folder(state, folder) {
                for pair in pairs {
                    println!("{} = {}", pair.known, pair.learn);
                }
            }
            println!("\nAdd words with `wordmatch add {folder:?} known=learn ...`.");
        }
    }
}
