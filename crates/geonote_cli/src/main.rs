//! `geonote` command-line entry point.
//!
//! # Responsibility
//! - Drive a SQLite-backed `NoteStore` from shell commands.
//! - Print one JSON document per command on stdout.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use geonote_core::{
    default_log_level, init_logging, NewNote, NoteFilter, NoteId, NotePatch, NoteStore,
    SqliteStorage, StoreConfig, DEFAULT_STORAGE_KEY,
};
use log::info;
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "geonote", version, about = "Manage geotagged notes")]
struct Cli {
    /// SQLite database holding the note slots.
    #[arg(long, env = "GEONOTE_DB", default_value = "geonote.sqlite3")]
    db: PathBuf,

    /// Storage slot key of the collection.
    #[arg(long, env = "GEONOTE_KEY", default_value = DEFAULT_STORAGE_KEY)]
    key: String,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "GEONOTE_LOG_DIR")]
    log_dir: Option<String>,

    #[arg(long, env = "GEONOTE_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a note.
    Add(AddArgs),
    /// List notes, optionally filtered.
    List {
        #[arg(long, conflicts_with = "date")]
        category: Option<String>,
        /// Prefix of `createdAt`, e.g. `2026-10-18`.
        #[arg(long)]
        date: Option<String>,
    },
    /// Print one note.
    Show { id: NoteId },
    /// Overwrite selected fields of a note.
    Update(UpdateArgs),
    /// Delete a note.
    Delete { id: NoteId },
    /// List distinct categories.
    Categories,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    lng: f64,
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: String,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    id: NoteId,
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    lng: Option<f64>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long, conflicts_with = "clear_description")]
    description: Option<String>,
    #[arg(long)]
    clear_description: bool,
    #[arg(long)]
    category: Option<String>,
}

impl UpdateArgs {
    fn patch(&self) -> NotePatch {
        let description = if self.clear_description {
            Some(None)
        } else {
            self.description.clone().map(Some)
        };
        NotePatch {
            lat: self.lat,
            lng: self.lng,
            title: self.title.clone(),
            description,
            category: self.category.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let storage = SqliteStorage::open(&cli.db)
        .with_context(|| format!("failed to open `{}`", cli.db.display()))?;
    let mut store = NoteStore::open(storage, StoreConfig::with_key(cli.key.as_str()))?;
    info!(
        "event=cli_command module=cli status=start db={}",
        cli.db.display()
    );

    let output = run(&mut store, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run(store: &mut NoteStore<SqliteStorage>, command: Command) -> Result<serde_json::Value> {
    let output = match command {
        Command::Add(args) => {
            let mut input = NewNote::new(args.lat, args.lng, args.title, args.category);
            input.description = args.description;
            serde_json::to_value(store.create(input)?)?
        }
        Command::List { category, date } => {
            let filter = match (category, date) {
                (Some(category), _) => Some(NoteFilter::Category(category)),
                (None, Some(date)) => Some(NoteFilter::DatePrefix(date)),
                (None, None) => None,
            };
            match filter {
                Some(filter) => serde_json::to_value(store.filtered(&filter))?,
                None => serde_json::to_value(store.notes())?,
            }
        }
        Command::Show { id } => match store.get(&id) {
            Some(note) => serde_json::to_value(note)?,
            None => json!(null),
        },
        Command::Update(args) => {
            let updated = store.update(&args.id, args.patch())?;
            json!({ "updated": updated, "note": store.get(&args.id) })
        }
        Command::Delete { id } => {
            let removed = store.delete(&id)?;
            json!({ "removed": removed })
        }
        Command::Categories => json!(store.categories()),
    };
    Ok(output)
}
