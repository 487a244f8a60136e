//! Error types shared across the crate.

use thiserror::Error;

/// Failure of a single call to one of the remote services.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("URL: '{url}' returned unexpected status code {status}")]
    Status { url: String, status: u16 },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RemoteError {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteError::Transport(_) => "transport",
            RemoteError::Status { .. } => "status",
            RemoteError::Decode(_) => "decode",
        }
    }
}

/// Failure of one join-and-submit run, tagged with the step that failed.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("User fetch failed: {0}")]
    User(#[source] RemoteError),

    #[error("Video fetch failed: {0}")]
    Video(#[source] RemoteError),

    #[error("Index submission failed: {0}")]
    Submit(#[source] RemoteError),
}

impl ProcessError {
    pub fn stage(&self) -> &'static str {
        match self {
            ProcessError::User(_) => "user",
            ProcessError::Video(_) => "video",
            ProcessError::Submit(_) => "submit",
        }
    }

    pub fn remote(&self) -> &RemoteError {
        match self {
            ProcessError::User(e) | ProcessError::Video(e) | ProcessError::Submit(e) => e,
        }
    }
}

/// Invalid startup configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required variable {0}")]
    Missing(&'static str),

    #[error("Invalid value set for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },

    #[error("NUM_THREADS must be at least 1")]
    ZeroThreads,

    #[error("RETRY_MAX_IN_FLIGHT must be at least 1")]
    ZeroRetryLimit,
}

/// Reason an input line was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("line must have exactly 2 values, found {0}")]
    FieldCount(usize),

    #[error("line has an empty id")]
    Empty,

    #[error("id '{0}' is not an integer")]
    NotInteger(String),
}
