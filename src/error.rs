//! Error types for content loading and rendering

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the content repository
#[derive(Error, Debug)]
pub enum Error {
    /// The content directory or a document file could not be read
    #[error("Content unavailable at {path:?}: {source}")]
    RepositoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Front-matter is missing, unparseable, or lacks a required field
    #[error("Malformed document {path:?}: {reason}")]
    MalformedDocument { path: PathBuf, reason: String },

    /// Two files resolve to the same document id
    #[error("Duplicate document id: {id}")]
    DuplicateId { id: String },

    #[error("Render error: {0}")]
    RenderFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::RepositoryUnavailable {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
