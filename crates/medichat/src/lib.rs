//! Core types for the medichat retrieval-augmented medical chatbot.
//!
//! This crate holds everything that is independent of a particular hosted
//! service: the [`Document`] model, the trait seams for embeddings, vector
//! stores, retrievers and chat models, the PDF loader, metadata
//! normalization, prompt templates, and the [`RagChain`] that ties the query
//! path together. Provider crates (`medichat-gemini`, `medichat-pinecone`)
//! implement the traits; the server crate wires them up.

pub mod chains;
pub mod chat_models;
pub mod config;
pub mod documents;
pub mod embeddings;
pub mod error;
pub mod loaders;
pub mod normalize;
pub mod prompts;
pub mod retrievers;
pub mod retry;
pub mod vector_stores;

pub use chains::RagChain;
pub use chat_models::{ChatModel, Message};
pub use documents::{Document, DocumentLoader};
pub use embeddings::Embeddings;
pub use error::{Error, Result};
pub use loaders::PdfDirectoryLoader;
pub use normalize::{normalize_documents, TitleResolver};
pub use retrievers::{Retriever, VectorStoreRetriever, DEFAULT_TOP_K};
pub use vector_stores::VectorStore;
