//! Document types.
//!
//! `Document` is the single unit of content flowing through the system: the
//! PDF loader produces one per page, the normalizer rewrites metadata, the
//! text splitter fans each one out into chunks, and the vector store indexes
//! and returns them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;

/// A piece of text with associated metadata.
///
/// # Example
///
/// ```
/// use medichat::Document;
///
/// let doc = Document::new("Hemoglobin carries oxygen.")
///     .with_metadata("source", "data/hematology.pdf")
///     .with_metadata("page", 12);
/// assert_eq!(doc.page_content, "Hemoglobin carries oxygen.");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The text content.
    pub page_content: String,

    /// Arbitrary metadata (source path, page number, book title, score, ...).
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,

    /// Optional unique identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Document {
    /// Create a new document with empty metadata.
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: HashMap::new(),
            id: None,
        }
    }

    /// Builder-style metadata insertion.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Builder-style id assignment.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Get a metadata value by exact key.
    #[must_use]
    pub fn get_metadata(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.get(key)
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.page_content)
    }
}

/// Loads documents from some source (a directory of PDFs, for instance).
pub trait DocumentLoader: Send + Sync {
    /// Load all documents eagerly.
    fn load(&self) -> Result<Vec<Document>>;
}
