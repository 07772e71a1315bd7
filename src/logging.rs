//! File-based tracing setup.
//!
//! The alternate screen owns stdout, so log lines go to a file instead.
//! Logging is best-effort: a log file that cannot be opened never stops the
//! application from starting.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Like [`init`], but on failure warns on stderr and carries on without a
/// subscriber.  Returns whether file logging is active.
pub fn init_or_warn(path: &Path, default_filter: &str) -> bool {
    match init(path, default_filter) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("warning: logging disabled: {e:#}");
            false
        }
    }
}

/// Install the global subscriber, appending to `path`.
///
/// `RUST_LOG` takes precedence over `default_filter`.
pub fn init(path: &Path, default_filter: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create log directory `{}`", parent.display()))?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file `{}`", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("invalid log filter `{default_filter}`"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = %path.display(),
        "logging initialised"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unopenable_log_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // The directory itself cannot be opened for appending.
        assert!(!init_or_warn(dir.path(), "info"));
    }
}
