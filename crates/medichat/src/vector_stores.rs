//! Vector store interface.

use async_trait::async_trait;

use crate::documents::Document;
use crate::error::Result;

/// Interface for vector stores.
///
/// A vector store owns its embedding model: `add_documents` embeds and
/// indexes, `similarity_search` embeds the query and searches. Similarity is
/// whatever metric the index was created with (cosine for this system).
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embed and index the given documents. Returns the assigned vector ids.
    ///
    /// When `ids` is `None`, implementations generate unique ids. Re-adding
    /// the same content under fresh ids creates duplicates; there is no
    /// dedup.
    async fn add_documents(&self, documents: &[Document], ids: Option<&[String]>) -> Result<Vec<String>>;

    /// Return the `k` documents most similar to `query`.
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>>;

    /// Delete every vector in the store's namespace.
    async fn delete_all(&self) -> Result<()>;
}
