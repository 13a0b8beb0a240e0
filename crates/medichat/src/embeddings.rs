//! Embedding model interface.

use async_trait::async_trait;

use crate::error::Result;

/// Interface for embedding models.
///
/// Documents and queries may be embedded differently (retrieval-tuned models
/// distinguish the two), so the trait exposes both operations. Implementations
/// must produce vectors of a fixed dimensionality; the index is created with
/// that dimensionality and Pinecone rejects mismatches.
#[async_trait]
pub trait Embeddings: Send + Sync {
    /// Embed a batch of document texts for indexing.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query text for search.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}
