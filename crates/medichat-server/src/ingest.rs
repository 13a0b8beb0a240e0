//! Offline indexing pipeline: load PDFs, normalize metadata, chunk, upsert.

use std::path::PathBuf;

use medichat::config::{CHUNK_OVERLAP, CHUNK_SIZE};
use medichat::documents::DocumentLoader;
use medichat::loaders::PdfDirectoryLoader;
use medichat::normalize::{normalize_documents, TitleResolver};
use medichat::vector_stores::VectorStore;
use medichat::{Document, Result};
use medichat_text_splitters::{RecursiveCharacterTextSplitter, TextSplitter};
use tracing::info;

/// Runs the four indexing stages once per invocation.
///
/// There is no dedup: re-running over the same data appends duplicate chunks
/// under fresh ids. Clear the namespace first when re-indexing.
pub struct IndexingPipeline {
    loader: PdfDirectoryLoader,
    resolver: TitleResolver,
    splitter: RecursiveCharacterTextSplitter,
}

impl IndexingPipeline {
    /// Build a pipeline over a directory of PDFs with the standard chunking
    /// settings.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            loader: PdfDirectoryLoader::new(data_dir),
            resolver: TitleResolver::default(),
            splitter: RecursiveCharacterTextSplitter::new()
                .with_chunk_size(CHUNK_SIZE)
                .with_chunk_overlap(CHUNK_OVERLAP),
        }
    }

    /// Load, normalize and chunk, without touching the store.
    pub fn load_chunks(&self) -> Result<Vec<Document>> {
        let raw = self.loader.load()?;
        info!(pages = raw.len(), "loaded page documents");

        let normalized = normalize_documents(&raw, &self.resolver);
        let chunks = self.splitter.split_documents(&normalized);
        info!(chunks = chunks.len(), "split into chunks");

        Ok(chunks)
    }

    /// Run the full pipeline, upserting into the given store. Returns the
    /// assigned vector ids.
    pub async fn run(&self, store: &dyn VectorStore) -> Result<Vec<String>> {
        let chunks = self.load_chunks()?;
        let ids = store.add_documents(&chunks, None).await?;
        info!(indexed = ids.len(), "indexing complete");
        Ok(ids)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingStore {
        added: Mutex<Vec<Document>>,
    }

    #[async_trait]
    impl VectorStore for RecordingStore {
        async fn add_documents(
            &self,
            documents: &[Document],
            _ids: Option<&[String]>,
        ) -> Result<Vec<String>> {
            self.added.lock().unwrap().extend_from_slice(documents);
            Ok(documents.iter().map(|_| "id".to_string()).collect())
        }

        async fn similarity_search(&self, _query: &str, _k: usize) -> Result<Vec<Document>> {
            Ok(Vec::new())
        }

        async fn delete_all(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_run_over_empty_directory_indexes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = IndexingPipeline::new(dir.path());
        let store = RecordingStore {
            added: Mutex::new(Vec::new()),
        };
        let ids = pipeline.run(&store).await.unwrap();
        assert!(ids.is_empty());
        assert!(store.added.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_fails_on_missing_directory() {
        let pipeline = IndexingPipeline::new("/nonexistent/medichat-ingest-dir");
        let store = RecordingStore {
            added: Mutex::new(Vec::new()),
        };
        assert!(pipeline.run(&store).await.is_err());
    }
}
