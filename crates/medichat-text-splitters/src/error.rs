//! Error types for text splitting.

use thiserror::Error;

/// Result type for splitter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced when configuring a splitter.
#[derive(Error, Debug)]
pub enum Error {
    /// The splitter configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
