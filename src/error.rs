//! Error types for merge-into-series.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for merge-into-series.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors
    #[error("No episodes found for {0}")]
    NoEpisodesFound(String),

    #[error("No video files found matching {0}")]
    NoVideoFilesFound(String),

    #[error("Series '{0}' not found in configuration")]
    SeriesNotFound(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid configuration at line {line}: {reason}")]
    InvalidConfig { line: usize, reason: String },

    #[error("Config file already exists: {0}")]
    ConfigExists(String),

    // Matching/planning errors
    #[error("Conflict: {0}")]
    Conflict(String),

    // Execution errors
    #[error("{failed} of {total} operations failed")]
    OperationFailed { failed: usize, total: usize },

    #[error("Operation cancelled by user")]
    Cancelled,

    // Scraper errors
    #[error("Failed to scrape episode guide: {0}")]
    Scrape(String),

    // Prompt errors
    #[error("Prompt failed: {0}")]
    Prompt(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Create a conflict error from a string.
    pub fn conflict<S: Into<String>>(msg: S) -> Self {
        Error::Conflict(msg.into())
    }

    /// Whether this error means the user interrupted the run.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // Ctrl-C inside a raw-mode prompt surfaces as an interrupted read.
        match &err {
            dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                Error::Cancelled
            }
            _ => Error::Prompt(err.to_string()),
        }
    }
}
