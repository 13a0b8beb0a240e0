//! Google Gemini embeddings client.
//!
//! Wraps the `embedContent` and `batchEmbedContents` endpoints of the
//! Generative Language REST API. The indexing pipeline pins the output
//! dimensionality to the index dimension (384) via `with_dimensions`.

use async_trait::async_trait;
use medichat::config::{env_string, GEMINI_API_KEY};
use medichat::embeddings::Embeddings;
use medichat::retry::{with_retry, RetryPolicy};
use medichat::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_MODEL: &str = "text-embedding-004";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Task type hint, which tunes the embedding for a use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    /// Text is a search query.
    RetrievalQuery,
    /// Text is a document being indexed for search.
    RetrievalDocument,
    /// Text will be compared for semantic similarity.
    SemanticSimilarity,
}

/// Gemini embedding model client.
///
/// # Configuration
///
/// The API key comes from `GEMINI_API_KEY` or `with_api_key`. For
/// `text-embedding-004` the output dimensionality is configurable from 1 to
/// 768 via `with_dimensions`.
pub struct GeminiEmbeddings {
    api_key: Option<String>,
    model: String,
    api_base: String,
    client: Client,
    task_type: Option<TaskType>,
    output_dimensionality: Option<u32>,
    batch_size: usize,
    retry_policy: RetryPolicy,
}

impl GeminiEmbeddings {
    /// Create a client with default settings: `text-embedding-004`, batch
    /// size 100, API key from the environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_key: env_string(GEMINI_API_KEY),
            model: DEFAULT_MODEL.to_string(),
            api_base: API_BASE.to_string(),
            client: Client::new(),
            task_type: None,
            output_dimensionality: None,
            batch_size: 100,
            retry_policy: RetryPolicy::exponential(3),
        }
    }

    /// Set the API key explicitly.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL. Intended for tests against a local mock
    /// server.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the task type hint.
    #[must_use]
    pub fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }

    /// Set the output dimensionality (1 to 768 for `text-embedding-004`).
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: u32) -> Self {
        self.output_dimensionality = Some(dimensions);
        self
    }

    /// Set the batch size for `batchEmbedContents` requests. The API caps a
    /// batch at 100 texts.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.min(100);
        self
    }

    /// Set the retry policy for API calls. Default is exponential with 3
    /// retries.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    fn get_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            Error::config("GEMINI_API_KEY not set. Set it via environment variable or with_api_key()")
        })
    }

    fn embed_request(&self, text: &str) -> EmbedContentRequest {
        EmbedContentRequest {
            content: Content {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
            task_type: self.task_type,
            output_dimensionality: self.output_dimensionality,
        }
    }

    async fn embed_single(&self, text: &str) -> Result<Vec<f32>> {
        let api_key = self.get_api_key()?;
        // The key travels in a header so it never appears in error output.
        let url = format!("{}/models/{}:embedContent", self.api_base, self.model);
        let request = self.embed_request(text);
        debug!(model = %self.model, "embedding query text");

        let response = with_retry(&self.retry_policy, || async {
            self.client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(&request)
                .send()
                .await
                .map_err(|e| Error::api(format!("Gemini API request failed: {e}")))?
                .error_for_status()
                .map_err(|e| Error::api(format!("Gemini API error: {e}")))
        })
        .await?;

        let embed_response: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| Error::api(format!("Failed to parse Gemini response: {e}")))?;

        debug!(
            dimensions = embed_response.embedding.values.len(),
            "received embedding"
        );
        Ok(embed_response.embedding.values)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let api_key = self.get_api_key()?;
        let url = format!("{}/models/{}:batchEmbedContents", self.api_base, self.model);
        let batch_request = BatchEmbedContentsRequest {
            requests: texts.iter().map(|text| self.embed_request(text)).collect(),
        };
        debug!(model = %self.model, batch = texts.len(), "embedding document batch");

        let response = with_retry(&self.retry_policy, || async {
            self.client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(&batch_request)
                .send()
                .await
                .map_err(|e| Error::api(format!("Gemini API request failed: {e}")))?
                .error_for_status()
                .map_err(|e| Error::api(format!("Gemini API error: {e}")))
        })
        .await?;

        let batch_response: BatchEmbedContentsResponse = response
            .json()
            .await
            .map_err(|e| Error::api(format!("Failed to parse Gemini response: {e}")))?;

        debug!(
            embeddings = batch_response.embeddings.len(),
            "received batch embeddings"
        );
        Ok(batch_response
            .embeddings
            .into_iter()
            .map(|e| e.values)
            .collect())
    }
}

impl Default for GeminiEmbeddings {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embeddings for GeminiEmbeddings {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size) {
            let batch = self.embed_batch(chunk).await?;
            all_embeddings.extend(batch);
        }
        Ok(all_embeddings)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_single(text).await
    }
}

// Request/response types for the Gemini API.

#[derive(Debug, Serialize)]
struct EmbedContentRequest {
    content: Content,
    #[serde(skip_serializing_if = "Option::is_none", rename = "taskType")]
    task_type: Option<TaskType>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        rename = "outputDimensionality"
    )]
    output_dimensionality: Option<u32>,
}

#[derive(Debug, Serialize)]
struct BatchEmbedContentsRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedContentsResponse {
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}
