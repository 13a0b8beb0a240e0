//! The `TextSplitter` trait and separator handling options.

use medichat::Document;

/// Where to keep the separator when splitting text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeepSeparator {
    /// Discard the separator.
    #[default]
    False,
    /// Keep the separator at the start of the following chunk.
    Start,
    /// Keep the separator at the end of the preceding chunk.
    End,
}

/// Splits text into chunks bounded by a chunk size.
pub trait TextSplitter {
    /// Split text into chunks.
    fn split_text(&self, text: &str) -> Vec<String>;

    /// The configured maximum chunk length.
    fn chunk_size(&self) -> usize;

    /// The configured overlap between adjacent chunks.
    fn chunk_overlap(&self) -> usize;

    /// Split each document's content, producing one document per chunk.
    ///
    /// Chunks inherit the parent document's metadata unchanged. Document
    /// order and within-document chunk order are preserved; empty or
    /// whitespace-only chunks are dropped.
    fn split_documents(&self, documents: &[Document]) -> Vec<Document> {
        documents
            .iter()
            .flat_map(|doc| {
                self.split_text(&doc.page_content)
                    .into_iter()
                    .filter(|chunk| !chunk.trim().is_empty())
                    .map(|chunk| Document {
                        page_content: chunk,
                        metadata: doc.metadata.clone(),
                        id: None,
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
