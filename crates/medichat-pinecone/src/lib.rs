//! Pinecone integration for medichat.
//!
//! Provides [`PineconeVectorStore`], an implementation of
//! `medichat::VectorStore` over a serverless Pinecone index.

pub mod pinecone;

pub use pinecone::PineconeVectorStore;
