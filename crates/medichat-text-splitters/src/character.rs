//! Character-based text splitters.
//!
//! `RecursiveCharacterTextSplitter` is the one the indexing pipeline uses:
//! it tries paragraph breaks first, then line breaks, then spaces, and only
//! falls back to cutting mid-word when a run of text has no better boundary.

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::split_utils::split_text_with_regex;
use crate::traits::{KeepSeparator, TextSplitter};

/// Default maximum chunk length in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default overlap between adjacent chunks in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 20;

/// Shared configuration for the character splitters.
#[derive(Debug, Clone)]
pub struct TextSplitterConfig {
    /// Maximum chunk length.
    pub chunk_size: usize,
    /// Overlap carried from one chunk into the next.
    pub chunk_overlap: usize,
    /// Length measure (defaults to byte length).
    pub length_function: fn(&str) -> usize,
    /// Where split separators end up.
    pub keep_separator: KeepSeparator,
    /// Trim whitespace from merged chunks.
    pub strip_whitespace: bool,
}

impl Default for TextSplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            length_function: str::len,
            keep_separator: KeepSeparator::False,
            strip_whitespace: true,
        }
    }
}

impl TextSplitterConfig {
    /// Check that the chunk size and overlap are coherent.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfiguration(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.chunk_overlap > self.chunk_size {
            return Err(Error::InvalidConfiguration(format!(
                "chunk_overlap ({}) must not exceed chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    fn join_window(&self, splits: &[String], window: &VecDeque<usize>, separator: &str) -> Option<String> {
        let joined = window
            .iter()
            .map(|&i| splits[i].as_str())
            .collect::<Vec<_>>()
            .join(separator);
        let joined = if self.strip_whitespace {
            joined.trim().to_string()
        } else {
            joined
        };
        (!joined.is_empty()).then_some(joined)
    }

    /// Merge small splits into chunks that respect `chunk_size`, carrying
    /// `chunk_overlap` trailing characters into each following chunk.
    pub fn merge_splits(&self, splits: &[String], separator: &str) -> Vec<String> {
        let separator_len = (self.length_function)(separator);
        let mut chunks = Vec::new();

        // sliding window of indices into `splits`
        let mut window: VecDeque<usize> = VecDeque::new();
        let mut total = 0usize;

        for (idx, split) in splits.iter().enumerate() {
            let len = (self.length_function)(split);
            let sep = if window.is_empty() { 0 } else { separator_len };

            if total + len + sep > self.chunk_size && !window.is_empty() {
                if total > self.chunk_size {
                    tracing::warn!(
                        length = total,
                        chunk_size = self.chunk_size,
                        "produced a chunk longer than chunk_size"
                    );
                }
                if let Some(chunk) = self.join_window(splits, &window, separator) {
                    chunks.push(chunk);
                }

                // shrink the window down to the overlap budget, and far
                // enough that the incoming split fits
                while total > self.chunk_overlap
                    || (total > 0
                        && total + len + if window.is_empty() { 0 } else { separator_len }
                            > self.chunk_size)
                {
                    let Some(front) = window.pop_front() else { break };
                    let front_len = (self.length_function)(&splits[front]);
                    total -= front_len + if window.is_empty() { 0 } else { separator_len };
                }
            }

            window.push_back(idx);
            total += len + if window.len() > 1 { separator_len } else { 0 };
        }

        if let Some(chunk) = self.join_window(splits, &window, separator) {
            chunks.push(chunk);
        }
        chunks
    }
}

/// Splits on a single fixed separator, then merges to the chunk size.
#[derive(Debug)]
pub struct CharacterTextSplitter {
    config: TextSplitterConfig,
    separator: String,
}

impl CharacterTextSplitter {
    /// Create a splitter on `"\n\n"` with the default chunk settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: TextSplitterConfig::default(),
            separator: "\n\n".to_string(),
        }
    }

    /// Set the separator to split on.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the maximum chunk length.
    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between adjacent chunks.
    #[must_use]
    pub fn with_chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }
}

impl Default for CharacterTextSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSplitter for CharacterTextSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        let pattern = regex::escape(&self.separator);
        let splits = split_text_with_regex(text, &pattern, self.config.keep_separator);
        let merge_separator = match self.config.keep_separator {
            KeepSeparator::False => self.separator.as_str(),
            _ => "",
        };
        self.config.merge_splits(&splits, merge_separator)
    }

    fn chunk_size(&self) -> usize {
        self.config.chunk_size
    }

    fn chunk_overlap(&self) -> usize {
        self.config.chunk_overlap
    }
}

/// Splits on a prioritized list of separators, recursing to finer-grained
/// ones whenever a piece is still longer than the chunk size.
///
/// # Example
///
/// ```
/// use medichat_text_splitters::{RecursiveCharacterTextSplitter, TextSplitter};
///
/// let splitter = RecursiveCharacterTextSplitter::new();
/// let chunks = splitter.split_text("First paragraph.\n\nSecond paragraph.");
/// assert!(chunks.iter().all(|c| c.len() <= 500));
/// ```
#[derive(Debug)]
pub struct RecursiveCharacterTextSplitter {
    config: TextSplitterConfig,
    separators: Vec<String>,
}

impl RecursiveCharacterTextSplitter {
    /// Create a splitter with separators `["\n\n", "\n", " ", ""]` and the
    /// default chunk settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: TextSplitterConfig {
                keep_separator: KeepSeparator::Start,
                ..TextSplitterConfig::default()
            },
            separators: vec![
                "\n\n".to_string(),
                "\n".to_string(),
                " ".to_string(),
                String::new(),
            ],
        }
    }

    /// Replace the separator priority list.
    #[must_use]
    pub fn with_separators(mut self, separators: Vec<String>) -> Self {
        self.separators = separators;
        self
    }

    /// Set the maximum chunk length.
    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between adjacent chunks.
    #[must_use]
    pub fn with_chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    fn split_text_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        // first separator actually present in the text wins; the empty
        // string matches anything and acts as the last resort
        let mut separator = separators.last().cloned().unwrap_or_default();
        let mut remaining: &[String] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() || text.contains(sep.as_str()) {
                separator = sep.clone();
                remaining = &separators[i + 1..];
                break;
            }
        }

        let pattern = regex::escape(&separator);
        let splits = split_text_with_regex(text, &pattern, self.config.keep_separator);
        let merge_separator = match self.config.keep_separator {
            KeepSeparator::False => separator.as_str(),
            _ => "",
        };

        let mut final_chunks = Vec::new();
        let mut pending: Vec<String> = Vec::new();
        for piece in splits {
            if (self.config.length_function)(&piece) < self.config.chunk_size {
                pending.push(piece);
            } else {
                if !pending.is_empty() {
                    final_chunks.extend(self.config.merge_splits(&pending, merge_separator));
                    pending.clear();
                }
                if remaining.is_empty() {
                    // unsplittable atom, emitted oversize
                    final_chunks.push(piece);
                } else {
                    final_chunks.extend(self.split_text_recursive(&piece, remaining));
                }
            }
        }
        if !pending.is_empty() {
            final_chunks.extend(self.config.merge_splits(&pending, merge_separator));
        }
        final_chunks
    }
}

impl Default for RecursiveCharacterTextSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSplitter for RecursiveCharacterTextSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        self.split_text_recursive(text, &self.separators)
    }

    fn chunk_size(&self) -> usize {
        self.config.chunk_size
    }

    fn chunk_overlap(&self) -> usize {
        self.config.chunk_overlap
    }
}
