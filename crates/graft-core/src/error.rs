//! Error types for the retrieval engine.

use thiserror::Error;

/// Result type alias using GraftError.
pub type Result<T> = std::result::Result<T, GraftError>;

/// Errors that can occur in the retrieval engine.
#[derive(Error, Debug)]
pub enum GraftError {
    /// Query rejected before any external call (empty or over-long).
    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// Both search methods returned nothing to fuse.
    #[error("No candidates returned by either search method")]
    EmptyCandidateSet,

    /// Embedding provider failure.
    #[error("Embedding provider error: {message}")]
    EmbeddingProvider { message: String },

    /// Lexical or vector search provider failure.
    #[error("Search provider error: {message}")]
    SearchProvider { message: String },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error (unexpected).
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GraftError {
    /// Create an invalid query error.
    pub fn invalid_query(reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            reason: reason.into(),
        }
    }

    /// Create an embedding provider error.
    pub fn embedding_provider(message: impl Into<String>) -> Self {
        Self::EmbeddingProvider {
            message: message.into(),
        }
    }

    /// Create a search provider error.
    pub fn search_provider(message: impl Into<String>) -> Self {
        Self::SearchProvider {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
