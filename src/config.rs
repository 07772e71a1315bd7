//! Command-line and environment configuration.
//!
//! Every flag has a `HACKER_STORIES_*` environment fallback; paths default
//! to the platform data / cache directories.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::search::{DEFAULT_KEY, DEFAULT_TERM};

const APP_DIR: &str = "hacker-stories";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Two built-in stories served after a delay; works offline.
    Demo,
    /// The Hacker News search API.
    Hn,
}

#[derive(Debug, Parser)]
#[command(name = "hacker-stories", version, about)]
pub struct Args {
    /// Where stories come from.
    #[arg(long, value_enum, default_value_t = SourceKind::Demo, env = "HACKER_STORIES_SOURCE")]
    pub source: SourceKind,

    /// Query sent to Hacker News (only with `--source hn`).
    #[arg(long, default_value = "react", env = "HACKER_STORIES_QUERY")]
    pub query: String,

    /// Artificial latency of the demo source, in milliseconds.
    #[arg(long, default_value_t = 2000, env = "HACKER_STORIES_DELAY_MS")]
    pub delay_ms: u64,

    /// Make the demo source fail, to see the error state.
    #[arg(long, env = "HACKER_STORIES_FAIL")]
    pub fail: bool,

    /// JSON file holding the persisted search term.
    #[arg(long, env = "HACKER_STORIES_STORE")]
    pub store: Option<PathBuf>,

    /// Keep the search term in memory only; nothing is read from or written
    /// to disk.
    #[arg(long, env = "HACKER_STORIES_EPHEMERAL")]
    pub ephemeral: bool,

    /// Store key for the search term.
    #[arg(long, default_value = DEFAULT_KEY, env = "HACKER_STORIES_SEARCH_KEY")]
    pub search_key: String,

    /// Search term used when none has been saved yet.
    #[arg(long, default_value = DEFAULT_TERM, env = "HACKER_STORIES_DEFAULT_TERM")]
    pub default_term: String,

    /// Log file (the terminal belongs to the UI).
    #[arg(long, env = "HACKER_STORIES_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. `info` or `hacker_stories=debug`.  `RUST_LOG` wins
    /// when set.
    #[arg(long, default_value = "info", env = "HACKER_STORIES_LOG_LEVEL")]
    pub log_level: String,
}

impl Args {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn store_path(&self) -> PathBuf {
        self.store.clone().unwrap_or_else(|| {
            base_dir(dirs::data_dir())
                .join(APP_DIR)
                .join("store.json")
        })
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            base_dir(dirs::cache_dir())
                .join(APP_DIR)
                .join("hacker-stories.log")
        })
    }
}

/// Fall back to the working directory when the platform has no such dir.
fn base_dir(dir: Option<PathBuf>) -> PathBuf {
    dir.unwrap_or_else(|| PathBuf::from("."))
}
