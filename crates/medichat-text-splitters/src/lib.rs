//! Text splitters for chunking documents before embedding.
//!
//! The indexing pipeline uses [`RecursiveCharacterTextSplitter`] with its
//! defaults (500-character chunks, 20-character overlap) so that each chunk
//! fits comfortably in the embedding model's input window while adjacent
//! chunks share enough context to survive boundary cuts.

pub mod character;
pub mod error;
pub mod split_utils;
pub mod traits;

pub use character::{
    CharacterTextSplitter, RecursiveCharacterTextSplitter, TextSplitterConfig,
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
};
pub use error::{Error, Result};
pub use traits::{KeepSeparator, TextSplitter};
