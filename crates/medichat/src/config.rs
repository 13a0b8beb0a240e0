//! Environment configuration and index constants.
//!
//! The whole system is configured through two environment variables; there is
//! no config file. Index parameters are fixed because the stored vectors are
//! only meaningful for the embedding model and dimensionality they were
//! created with.

use crate::error::{Error, Result};

/// Environment variable holding the Pinecone API key.
pub const PINECONE_API_KEY: &str = "PINECONE_API_KEY";

/// Environment variable holding the Google Gemini API key.
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Name of the Pinecone index.
pub const INDEX_NAME: &str = "medical-chatbot";

/// Dimensionality of the stored embeddings.
pub const EMBEDDING_DIMENSION: u32 = 384;

/// Maximum chunk length in characters.
pub const CHUNK_SIZE: usize = 500;

/// Character overlap between adjacent chunks.
pub const CHUNK_OVERLAP: usize = 20;

/// Read an environment variable, treating empty values as unset.
#[must_use]
pub fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Read a required environment variable, failing with a configuration error.
pub fn require_env(name: &str) -> Result<String> {
    env_string(name).ok_or_else(|| Error::config(format!("{name} environment variable is not set")))
}
