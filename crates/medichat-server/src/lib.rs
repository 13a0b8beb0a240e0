//! Web server and indexing pipeline for the medichat medical chatbot.
//!
//! Two binaries share this library: `medichat-server` serves the chat UI and
//! the `/get` endpoint; `store-index` runs the offline
//! load-normalize-chunk-upsert pipeline.

pub mod ingest;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use ingest::IndexingPipeline;
pub use state::AppState;
