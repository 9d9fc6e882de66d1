//! Error types for the clawshare crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when talking to a ClawShare server.
///
/// Every remote-facing operation fails with exactly one of these; nothing is
/// retried internally.
#[derive(Error, Debug)]
pub enum ShareError {
    /// No HTTP response was obtained (connect, DNS, timeout, aborted body).
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered and reported a failure.
    #[error("{message}")]
    Api { status: Option<u16>, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ShareError {
    pub(crate) fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        ShareError::Api {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn local_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ShareError::LocalIo {
            path: path.into(),
            source,
        }
    }

    /// The server-provided message, if this is an API error.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            ShareError::Api { message, .. } => Some(message),
            _ => None,
        }
    }

    /// True when the failure happened before any HTTP response arrived.
    pub fn is_transport(&self) -> bool {
        matches!(self, ShareError::Transport(_))
    }
}

/// Result type alias for ShareError.
pub type Result<T> = std::result::Result<T, ShareError>;
