use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while fetching and saving a page fragment
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The browser process could not be started
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Attaching to an already running browser failed
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    /// The page could not be loaded
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Opening or closing a tab failed
    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// No element matched the selector
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Reading from the page failed
    #[error("Script evaluation failed: {0}")]
    EvaluationFailed(String),

    /// The fragment is not valid JSON
    #[error("Fragment at '{selector}' is not valid JSON: {source}")]
    MalformedJson {
        selector: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A saved document is not valid JSON
    #[error("{} is not valid JSON: {source}", path.display())]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Too few distinct gold emblems to fill an emblem set
    #[error("Need {required} distinct gold emblems, found {available}")]
    NotEnoughEmblems { required: usize, available: usize },
}

impl ScrapeError {
    /// True when the selector did not yield markup
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, ScrapeError::ElementNotFound(_) | ScrapeError::EvaluationFailed(_))
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ScrapeError>;
