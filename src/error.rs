//! Typed errors for the persistence layer.
//!
//! Sources and application plumbing use [`anyhow`]; store failures get a
//! concrete type because callers recover from them rather than bail.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access store file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store file `{path}` is not a flat JSON object of strings: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The backing store refused the operation (disabled, quota, injected fault).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
