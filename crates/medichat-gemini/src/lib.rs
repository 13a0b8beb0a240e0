//! Google Gemini integration for medichat.
//!
//! Provides [`GeminiEmbeddings`] (implements `medichat::Embeddings`) and
//! [`ChatGemini`] (implements `medichat::ChatModel`) over the Generative
//! Language REST API.

pub mod chat_models;
pub mod embeddings;

pub use chat_models::ChatGemini;
pub use embeddings::{GeminiEmbeddings, TaskType};
