//! Catalog command line.
//!
//! Builds catalog dictionaries, runs lookups and applies the session status
//! tasks over JSON exports from the training platform.
//!
//! ## Usage
//!
//! ```bash
//! # Print the dictionary (id -> search string) of a JSON array of trainings
//! catalog dictionary trainings.json
//!
//! # Look trainings up
//! catalog search trainings.json "gestion de crise" --limit 5
//!
//! # Fold accents out of a string
//! catalog normalize "Évaluation des compétences"
//!
//! # Apply open/close/archive to a JSON array of sessions
//! catalog sessions sessions.json --now 2024-05-01T00:00:00Z
//!
//! # Any command with a settings file
//! catalog --config catalog.toml search trainings.json excel
//! ```
//!
//! Set `RUST_LOG=catalog_core=debug` for indexing and task traces.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use catalog_core::{normalize, CatalogConfig, CatalogIndex, CatalogIndexer, Session, SessionTasks};
use catalog_types::{RawRecord, TrainingId};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Training catalog search tools")]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the catalog dictionary of a JSON array of trainings
    Dictionary {
        #[arg(value_name = "FILE")]
        records: PathBuf,
    },
    /// Look trainings up by free text
    Search {
        #[arg(value_name = "FILE")]
        records: PathBuf,
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Fold accents out of text
    Normalize { text: String },
    /// Run the session status tasks over a JSON array of sessions
    Sessions {
        #[arg(value_name = "FILE")]
        sessions: PathBuf,
        /// Reference time, RFC 3339 (defaults to the current time)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CatalogConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Dictionary { records } => {
            let records: Vec<RawRecord> = read_json(&records)?;
            let dictionary = CatalogIndexer::with_config(config.indexer).build_dictionary(records)?;
            let sorted: BTreeMap<TrainingId, String> = dictionary.into_iter().collect();
            println!("{}", serde_json::to_string_pretty(&sorted)?);
        }
        Command::Search {
            records,
            query,
            limit,
        } => {
            let records: Vec<RawRecord> = read_json(&records)?;
            let dictionary = CatalogIndexer::with_config(config.indexer).build_dictionary(records)?;
            let mut index = CatalogIndex::from_dictionary(&dictionary, config.search);
            info!(stats = %index.stats(), "index ready");

            for hit in index.search(&query, limit) {
                println!("{}\t{:.3}", hit.id, hit.score);
            }
        }
        Command::Normalize { text } => println!("{}", normalize(&text)),
        Command::Sessions { sessions, now } => {
            let mut list: Vec<Session> = read_json(&sessions)?;
            let now = now.unwrap_or_else(Utc::now);

            for report in SessionTasks::new(config.sessions).run_all(&mut list, now) {
                eprintln!("{}: {} session(s) moved", report.task.name(), report.transitioned.len());
            }
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}
