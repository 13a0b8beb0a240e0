//! Batch indexing job: populate the Pinecone index from a directory of PDFs.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use medichat::config::{require_env, EMBEDDING_DIMENSION, GEMINI_API_KEY, INDEX_NAME, PINECONE_API_KEY};
use medichat::VectorStore;
use medichat_gemini::{GeminiEmbeddings, TaskType};
use medichat_pinecone::PineconeVectorStore;
use medichat_server::{telemetry, IndexingPipeline};

#[derive(Parser, Debug)]
#[command(name = "store-index", about = "Index a directory of medical PDFs into Pinecone")]
struct Args {
    /// Directory containing the PDF corpus.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Delete all existing vectors in the namespace before indexing.
    /// Without this flag, re-running appends duplicate chunks.
    #[arg(long)]
    clear: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();
    let args = Args::parse();

    let gemini_key = require_env(GEMINI_API_KEY)?;
    let pinecone_key = require_env(PINECONE_API_KEY)?;

    let embeddings = Arc::new(
        GeminiEmbeddings::new()
            .with_api_key(&gemini_key)
            .with_task_type(TaskType::RetrievalDocument)
            .with_dimensions(EMBEDDING_DIMENSION),
    );
    let store = PineconeVectorStore::connect(INDEX_NAME, embeddings, Some(&pinecone_key)).await?;

    if args.clear {
        info!(index = INDEX_NAME, "clearing existing vectors");
        store.delete_all().await?;
    }

    let pipeline = IndexingPipeline::new(&args.data_dir);
    let ids = pipeline.run(&store).await?;
    info!(
        data_dir = %args.data_dir.display(),
        indexed = ids.len(),
        "store-index finished"
    );

    Ok(())
}
