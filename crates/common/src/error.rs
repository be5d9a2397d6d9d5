//! Unified error type for the city-context engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Source {source_name} violated its no-fail contract: {message}")]
    SourceFailure {
        source_name: &'static str,
        message: String,
    },

    #[error("Refresh deadline exceeded after {elapsed_secs}s")]
    RefreshTimeout { elapsed_secs: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
