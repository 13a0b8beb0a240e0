//! Metadata normalization for ingested documents.
//!
//! Raw loader metadata carries the full file path; the chat UI and answer
//! prompts want a human-readable book title. `normalize_documents` rewrites
//! each document's metadata down to `source`, `page` and `book`, with the
//! title derived from the file name via [`TitleResolver`].

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::documents::Document;

/// Sentinel used when a document is missing `source` or `page` metadata.
const UNKNOWN: &str = "Unknown";

fn digit_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"\d{10,}").unwrap()
    })
}

fn noise_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"(?i)\b(?:oss|pdf)\b").unwrap()
    })
}

/// Case-insensitive metadata lookup. PDF pipelines disagree on whether the
/// key is `source` or `Source`; accept both.
#[must_use]
pub fn source_from_metadata(doc: &Document) -> Option<&str> {
    doc.metadata
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("source"))
        .and_then(|(_, value)| value.as_str())
}

fn page_from_metadata(doc: &Document) -> Option<i64> {
    doc.metadata
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("page"))
        .and_then(|(_, value)| value.as_i64())
}

/// Derive a display title from a source file path.
///
/// Deterministic cleanup: strip directory and extension, turn `-`/`_` into
/// spaces, delete digit runs of ten or more (ISBN-style serials), delete
/// standalone `oss`/`pdf` tokens, collapse whitespace. May produce an empty
/// string for names made entirely of noise.
#[must_use]
pub fn book_title_from_source(source: &str) -> String {
    let stem = Path::new(source)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let spaced = stem.replace(['-', '_'], " ");
    let without_serials = digit_run_re().replace_all(&spaced, " ");
    let without_noise = noise_word_re().replace_all(&without_serials, " ");

    without_noise.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One canonical-title override: every keyword must appear in the cleaned,
/// lowercased file name for the override to fire.
#[derive(Debug, Clone)]
struct TitleOverride {
    keywords: Vec<String>,
    title: String,
}

/// Maps cleaned file names to canonical book titles.
///
/// Cleanup alone cannot reconstruct punctuation or articles ("A Laboratory
/// Guide to..."), so known books get keyword-triggered overrides. The table
/// is extensible; `Default` seeds it with the titles of the corpus this
/// system ships with.
#[derive(Debug, Clone)]
pub struct TitleResolver {
    overrides: Vec<TitleOverride>,
}

impl TitleResolver {
    /// An empty resolver with no overrides.
    #[must_use]
    pub fn empty() -> Self {
        Self { overrides: Vec::new() }
    }

    /// Add an override: when every keyword matches (case-insensitive), the
    /// canonical title wins over the cleaned file name.
    #[must_use]
    pub fn with_override(mut self, keywords: &[&str], title: &str) -> Self {
        self.overrides.push(TitleOverride {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            title: title.to_string(),
        });
        self
    }

    /// Resolve a source path to a book title.
    #[must_use]
    pub fn resolve(&self, source: &str) -> String {
        let cleaned = book_title_from_source(source);
        let lowered = cleaned.to_lowercase();
        for ov in &self.overrides {
            if ov.keywords.iter().all(|kw| lowered.contains(kw.as_str())) {
                return ov.title.clone();
            }
        }
        cleaned
    }
}

impl Default for TitleResolver {
    fn default() -> Self {
        Self::empty()
            .with_override(
                &["laboratory", "hematology"],
                "A Laboratory Guide to Clinical Hematology",
            )
            .with_override(&["human", "physiology"], "Human Physiology")
    }
}

/// Rewrite each document's metadata to exactly `source`, `page` and `book`.
///
/// Output preserves count and order. Page content is untouched. Missing
/// source or page metadata becomes the string `"Unknown"`.
#[must_use]
pub fn normalize_documents(documents: &[Document], resolver: &TitleResolver) -> Vec<Document> {
    documents
        .iter()
        .map(|doc| {
            let source = source_from_metadata(doc).unwrap_or(UNKNOWN).to_string();
            let book = resolver.resolve(&source);
            let page: Value = match page_from_metadata(doc) {
                Some(p) => p.into(),
                None => UNKNOWN.into(),
            };

            let mut normalized = Document::new(doc.page_content.clone())
                .with_metadata("source", source)
                .with_metadata("page", page)
                .with_metadata("book", book);
            normalized.id = doc.id.clone();
            normalized
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_title_strips_path_and_extension() {
        assert_eq!(book_title_from_source("data/Gray_Anatomy.pdf"), "Gray Anatomy");
    }

    #[test]
    fn test_title_removes_long_digit_runs() {
        assert_eq!(
            book_title_from_source("data/Human-Physiology-9780133983814.pdf"),
            "Human Physiology"
        );
    }

    #[test]
    fn test_title_keeps_short_digit_runs() {
        // years and edition numbers stay
        assert_eq!(
            book_title_from_source("data/Physiology_2nd_Edition_2019.pdf"),
            "Physiology 2nd Edition 2019"
        );
    }

    #[test]
    fn test_title_removes_noise_words() {
        assert_eq!(
            book_title_from_source("data/human-physiology-OSS.pdf"),
            "human physiology"
        );
        // "pdf" only as a standalone word, never inside another word
        assert_eq!(book_title_from_source("pdfreader-guide.txt"), "pdfreader guide");
    }

    #[test]
    fn test_title_all_noise_yields_empty() {
        assert_eq!(book_title_from_source("data/12345678901-oss.pdf"), "");
    }

    #[test]
    fn test_resolver_override_hematology() {
        let resolver = TitleResolver::default();
        assert_eq!(
            resolver.resolve("data/laboratory_guide_clinical_hematology_oss.pdf"),
            "A Laboratory Guide to Clinical Hematology"
        );
    }

    #[test]
    fn test_resolver_override_physiology_case_insensitive() {
        let resolver = TitleResolver::default();
        assert_eq!(
            resolver.resolve("data/HUMAN-PHYSIOLOGY-9780133983814.pdf"),
            "Human Physiology"
        );
    }

    #[test]
    fn test_resolver_requires_all_keywords() {
        let resolver = TitleResolver::default();
        // "hematology" alone does not trigger the laboratory-guide override
        assert_eq!(resolver.resolve("data/hematology-atlas.pdf"), "hematology atlas");
    }

    #[test]
    fn test_resolver_falls_back_to_cleaned_name() {
        let resolver = TitleResolver::default();
        assert_eq!(resolver.resolve("data/Gray_Anatomy.pdf"), "Gray Anatomy");
    }

    #[test]
    fn test_normalize_replaces_metadata() {
        let raw = vec![Document::new("text")
            .with_metadata("source", "data/human_physiology.pdf")
            .with_metadata("page", 4)
            .with_metadata("producer", "pdftool 1.2")];
        let docs = normalize_documents(&raw, &TitleResolver::default());

        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.page_content, "text");
        assert_eq!(doc.metadata.len(), 3);
        assert_eq!(doc.get_metadata("source").unwrap(), "data/human_physiology.pdf");
        assert_eq!(doc.get_metadata("page").unwrap(), 4);
        assert_eq!(doc.get_metadata("book").unwrap(), "Human Physiology");
        assert!(doc.get_metadata("producer").is_none());
    }

    #[test]
    fn test_normalize_accepts_capitalized_source_key() {
        let raw = vec![Document::new("text")
            .with_metadata("Source", "data/notes.pdf")
            .with_metadata("page", 0)];
        let docs = normalize_documents(&raw, &TitleResolver::default());
        assert_eq!(docs[0].get_metadata("source").unwrap(), "data/notes.pdf");
    }

    #[test]
    fn test_normalize_missing_metadata_uses_sentinel() {
        let raw = vec![Document::new("orphan")];
        let docs = normalize_documents(&raw, &TitleResolver::default());
        assert_eq!(docs[0].get_metadata("source").unwrap(), "Unknown");
        assert_eq!(docs[0].get_metadata("page").unwrap(), "Unknown");
    }

    #[test]
    fn test_normalize_preserves_order() {
        let raw: Vec<Document> = (0..5)
            .map(|i| Document::new(format!("page {i}")).with_metadata("page", i))
            .collect();
        let docs = normalize_documents(&raw, &TitleResolver::default());
        let contents: Vec<&str> = docs.iter().map(|d| d.page_content.as_str()).collect();
        assert_eq!(contents, ["page 0", "page 1", "page 2", "page 3", "page 4"]);
    }
}
