use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnippetError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Clipboard error: {0}")]
    Clipboard(String),
    #[error("Panel state is unavailable after a panic in another request")]
    StatePoisoned,
}

pub type Result<T> = std::result::Result<T, SnippetError>;
