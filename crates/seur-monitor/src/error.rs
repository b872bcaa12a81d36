//! Monitor error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reading page HTML.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Reading a local file failed.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP transport failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
}

/// Errors talking to a running monitor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MonitorError {
    /// The monitoring loop has stopped.
    #[error("Monitor is not running")]
    Closed,
}
