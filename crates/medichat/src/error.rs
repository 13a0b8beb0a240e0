//! Error types for medichat operations.
//!
//! All fallible operations in the workspace return [`Result`], an alias for
//! `std::result::Result<T, Error>`. Provider crates construct variants via
//! the helper constructors (`Error::api`, `Error::config`, ...) so call
//! sites stay terse.

use thiserror::Error;

/// Result type alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by medichat components.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Missing or invalid configuration (API keys, index settings).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A remote API call failed (Gemini, Pinecone).
    #[error("API error: {0}")]
    Api(String),

    /// Caller-supplied input was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Loading documents from disk failed.
    #[error("Document loading error: {0}")]
    DocumentLoading(String),

    /// Vector store operation failed.
    #[error("Vector store error: {0}")]
    VectorStore(String),

    /// Underlying I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a `Configuration` error from any string-like value.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create an `Api` error from any string-like value.
    pub fn api(msg: impl Into<String>) -> Self {
        Error::Api(msg.into())
    }

    /// Create an `InvalidInput` error from any string-like value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a `DocumentLoading` error from any string-like value.
    pub fn document_loading(msg: impl Into<String>) -> Self {
        Error::DocumentLoading(msg.into())
    }

    /// Create a `VectorStore` error from any string-like value.
    pub fn vector_store(msg: impl Into<String>) -> Self {
        Error::VectorStore(msg.into())
    }

    /// Whether retrying the failed operation could succeed.
    ///
    /// Only remote API failures are considered transient; configuration and
    /// input errors will fail the same way every time.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Api(_))
    }
}
