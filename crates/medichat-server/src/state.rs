//! Shared application state.

use std::sync::Arc;

use medichat::RagChain;

/// State handed to every request handler.
///
/// All clients are built once at startup; handlers only clone the `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The question-answering chain.
    pub chain: Arc<RagChain>,
}

impl AppState {
    /// Wrap a chain into shared state.
    pub fn new(chain: RagChain) -> Self {
        Self {
            chain: Arc::new(chain),
        }
    }
}
