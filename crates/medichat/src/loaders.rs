//! PDF directory loader.
//!
//! Reads every PDF in a directory (non-recursive) and produces one
//! [`Document`] per page, extracted page by page so page boundaries match
//! the document's own page tree.

use std::fs;
use std::path::{Path, PathBuf};

use crate::documents::{Document, DocumentLoader};
use crate::error::{Error, Result};

/// Loads all `*.pdf` files from a single directory.
///
/// Files are processed in lexicographic path order so repeated runs over the
/// same directory produce documents in the same order. Non-PDF entries are
/// skipped; a PDF that fails to parse aborts the whole load.
pub struct PdfDirectoryLoader {
    dir: PathBuf,
}

impl PdfDirectoryLoader {
    /// Create a loader for the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn is_pdf(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    }

    fn load_file(&self, path: &Path) -> Result<Vec<Document>> {
        let bytes = fs::read(path)?;
        let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| {
            Error::document_loading(format!("failed to extract text from {}: {e}", path.display()))
        })?;

        let source = path.display().to_string();
        let documents = pages
            .into_iter()
            .enumerate()
            .map(|(page, page_text)| {
                Document::new(page_text)
                    .with_metadata("source", source.clone())
                    .with_metadata("page", page as i64)
            })
            .collect();

        Ok(documents)
    }
}

impl DocumentLoader for PdfDirectoryLoader {
    fn load(&self) -> Result<Vec<Document>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)
            .map_err(|e| {
                Error::document_loading(format!("failed to read {}: {e}", self.dir.display()))
            })?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && Self::is_pdf(path))
            .collect();
        paths.sort();

        let mut documents = Vec::new();
        for path in &paths {
            let pages = self.load_file(path)?;
            tracing::info!(file = %path.display(), pages = pages.len(), "loaded PDF");
            documents.extend(pages);
        }

        tracing::info!(
            dir = %self.dir.display(),
            files = paths.len(),
            documents = documents.len(),
            "finished loading PDFs"
        );
        Ok(documents)
    }
}
