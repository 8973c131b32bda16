// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RagError>;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load document: {path}: {message}")]
    DocumentLoad { path: PathBuf, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Chat model error: {0}")]
    ChatModel(String),

    #[error("Web search error: {0}")]
    WebSearch(String),

    #[error("Routing error: {0}")]
    Routing(String),

    #[error("Embedding store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl RagError {
    pub fn document_load(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::DocumentLoad {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
