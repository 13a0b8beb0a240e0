//! Retriever interface and the vector-store-backed implementation.

use async_trait::async_trait;
use std::sync::Arc;

use crate::documents::Document;
use crate::error::Result;
use crate::vector_stores::VectorStore;

/// Number of chunks retrieved per query.
pub const DEFAULT_TOP_K: usize = 3;

/// Interface for document retrievers.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return documents relevant to the query.
    async fn get_relevant_documents(&self, query: &str) -> Result<Vec<Document>>;
}

/// Retriever backed by a [`VectorStore`] similarity search.
pub struct VectorStoreRetriever {
    store: Arc<dyn VectorStore>,
    k: usize,
}

impl VectorStoreRetriever {
    /// Create a retriever returning the top `k` results.
    pub fn new(store: Arc<dyn VectorStore>, k: usize) -> Self {
        Self { store, k }
    }

    /// The configured result count.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }
}

#[async_trait]
impl Retriever for VectorStoreRetriever {
    async fn get_relevant_documents(&self, query: &str) -> Result<Vec<Document>> {
        self.store.similarity_search(query, self.k).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct FixedStore {
        docs: Vec<Document>,
    }

    #[async_trait]
    impl VectorStore for FixedStore {
        async fn add_documents(
            &self,
            _documents: &[Document],
            _ids: Option<&[String]>,
        ) -> Result<Vec<String>> {
            Err(Error::vector_store("read-only test store"))
        }

        async fn similarity_search(&self, _query: &str, k: usize) -> Result<Vec<Document>> {
            Ok(self.docs.iter().take(k).cloned().collect())
        }

        async fn delete_all(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_retriever_caps_at_k() {
        let store = Arc::new(FixedStore {
            docs: vec![
                Document::new("a"),
                Document::new("b"),
                Document::new("c"),
                Document::new("d"),
            ],
        });
        let retriever = VectorStoreRetriever::new(store, DEFAULT_TOP_K);
        let docs = retriever.get_relevant_documents("anything").await.unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].page_content, "a");
    }
}
