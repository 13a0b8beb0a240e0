//! Chat server entry point.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use medichat::config::{require_env, EMBEDDING_DIMENSION, GEMINI_API_KEY, INDEX_NAME, PINECONE_API_KEY};
use medichat::{RagChain, VectorStoreRetriever, DEFAULT_TOP_K};
use medichat_gemini::{ChatGemini, GeminiEmbeddings, TaskType};
use medichat_pinecone::PineconeVectorStore;
use medichat_server::{routes, telemetry, AppState};

#[derive(Parser, Debug)]
#[command(name = "medichat-server", about = "Medical RAG chatbot web server")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();
    let args = Args::parse();

    // Fail at startup, not on the first request, when keys are missing.
    let gemini_key = require_env(GEMINI_API_KEY)?;
    let pinecone_key = require_env(PINECONE_API_KEY)?;

    let embeddings = Arc::new(
        GeminiEmbeddings::new()
            .with_api_key(&gemini_key)
            .with_task_type(TaskType::RetrievalQuery)
            .with_dimensions(EMBEDDING_DIMENSION),
    );
    let store = PineconeVectorStore::connect(INDEX_NAME, embeddings, Some(&pinecone_key)).await?;
    let retriever = VectorStoreRetriever::new(Arc::new(store), DEFAULT_TOP_K);

    let chat_model = ChatGemini::new()
        .with_api_key(&gemini_key)
        .with_temperature(0.2);

    let chain = RagChain::new(Arc::new(chat_model), Arc::new(retriever));
    let state = AppState::new(chain);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    info!(addr = %args.listen, index = INDEX_NAME, "serving medichat");
    axum::serve(listener, routes::router(state)).await?;

    Ok(())
}
