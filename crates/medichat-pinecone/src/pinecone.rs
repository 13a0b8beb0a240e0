//! Pinecone-backed vector store.
//!
//! `PineconeVectorStore` owns an embedding model and talks to one serverless
//! index. Chunk text is mirrored into vector metadata under the `"text"` key
//! so that query matches can be turned back into documents; Pinecone itself
//! stores only vectors and metadata.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pinecone_sdk::models::{
    Cloud, DeletionProtection, Kind, Metadata, Metric, Value as PineconeValue, Vector, WaitPolicy,
};
use pinecone_sdk::pinecone::{PineconeClient, PineconeClientConfig};
use serde_json::Value as JsonValue;

use medichat::config::EMBEDDING_DIMENSION;
use medichat::documents::Document;
use medichat::embeddings::Embeddings;
use medichat::vector_stores::VectorStore;
use medichat::{Error, Result};

/// Serverless cloud region the index is created in.
const INDEX_REGION: &str = "us-east-1";

/// Metadata key under which chunk text is stored.
const TEXT_KEY: &str = "text";

/// Vector store backed by a Pinecone serverless index.
pub struct PineconeVectorStore {
    client: PineconeClient,
    index_host: String,
    embeddings: Arc<dyn Embeddings>,
    namespace: Option<String>,
}

impl PineconeVectorStore {
    /// Connect to the named index, creating it if it does not exist.
    ///
    /// The index is created serverless on AWS us-east-1 with cosine metric
    /// and the workspace embedding dimension (384). If `api_key` is `None`,
    /// the SDK reads `PINECONE_API_KEY` from the environment.
    pub async fn connect(
        index_name: &str,
        embeddings: Arc<dyn Embeddings>,
        api_key: Option<&str>,
    ) -> Result<Self> {
        let config = PineconeClientConfig {
            api_key: api_key.map(ToString::to_string),
            ..Default::default()
        };
        let client = config
            .client()
            .map_err(|e| Error::config(format!("Failed to create Pinecone client: {e}")))?;

        let index_host = Self::ensure_index(&client, index_name).await?;

        Ok(Self {
            client,
            index_host,
            embeddings,
            namespace: None,
        })
    }

    /// Set the namespace for all subsequent operations.
    #[must_use]
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    /// Describe the index, creating it first when absent. Returns the index
    /// host for data-plane calls.
    async fn ensure_index(client: &PineconeClient, index_name: &str) -> Result<String> {
        if let Ok(index) = client.describe_index(index_name).await {
            return Ok(index.host);
        }

        tracing::info!(
            index = index_name,
            dimension = EMBEDDING_DIMENSION,
            "index not found, creating serverless index"
        );
        let index = client
            .create_serverless_index(
                index_name,
                EMBEDDING_DIMENSION as i32,
                Metric::Cosine,
                Cloud::Aws,
                INDEX_REGION,
                DeletionProtection::Disabled,
                WaitPolicy::WaitFor(Duration::from_secs(60)),
            )
            .await
            .map_err(|e| Error::vector_store(format!("Failed to create Pinecone index: {e}")))?;

        Ok(index.host)
    }

    fn json_to_pinecone_value(json: &JsonValue) -> PineconeValue {
        let kind = match json {
            JsonValue::Null => Some(Kind::NullValue(0)),
            JsonValue::Bool(b) => Some(Kind::BoolValue(*b)),
            JsonValue::Number(n) => n.as_f64().map(Kind::NumberValue),
            JsonValue::String(s) => Some(Kind::StringValue(s.clone())),
            // the SDK has no list kind here; arrays are stored as JSON text
            JsonValue::Array(arr) => {
                Some(Kind::StringValue(serde_json::to_string(arr).unwrap_or_default()))
            }
            JsonValue::Object(obj) => {
                let fields: BTreeMap<String, PineconeValue> = obj
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::json_to_pinecone_value(v)))
                    .collect();
                Some(Kind::StructValue(Metadata { fields }))
            }
        };
        PineconeValue { kind }
    }

    fn pinecone_value_to_json(value: &PineconeValue) -> JsonValue {
        match &value.kind {
            None | Some(Kind::NullValue(_)) => JsonValue::Null,
            Some(Kind::BoolValue(b)) => JsonValue::Bool(*b),
            Some(Kind::NumberValue(n)) => serde_json::Number::from_f64(*n)
                .map_or(JsonValue::Null, JsonValue::Number),
            Some(Kind::StringValue(s)) => JsonValue::String(s.clone()),
            Some(Kind::ListValue(_)) => JsonValue::Null,
            Some(Kind::StructValue(metadata)) => {
                let map: serde_json::Map<String, JsonValue> = metadata
                    .fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::pinecone_value_to_json(v)))
                    .collect();
                JsonValue::Object(map)
            }
        }
    }

    fn metadata_to_pinecone(metadata: &HashMap<String, JsonValue>) -> Metadata {
        let fields: BTreeMap<String, PineconeValue> = metadata
            .iter()
            .map(|(k, v)| (k.clone(), Self::json_to_pinecone_value(v)))
            .collect();
        Metadata { fields }
    }

    fn pinecone_to_metadata(metadata: &Metadata) -> HashMap<String, JsonValue> {
        metadata
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), Self::pinecone_value_to_json(v)))
            .collect()
    }

    fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or("")
    }
}

#[async_trait]
impl VectorStore for PineconeVectorStore {
    async fn add_documents(
        &self,
        documents: &[Document],
        ids: Option<&[String]>,
    ) -> Result<Vec<String>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(ids) = ids {
            if ids.len() != documents.len() {
                return Err(Error::config(format!(
                    "IDs length mismatch: {} vs {}",
                    ids.len(),
                    documents.len()
                )));
            }
        }

        let texts: Vec<String> = documents.iter().map(|d| d.page_content.clone()).collect();
        let embeddings = self.embeddings.embed_documents(&texts).await?;

        let doc_ids: Vec<String> = match ids {
            Some(ids) => ids.to_vec(),
            None => (0..documents.len())
                .map(|_| uuid::Uuid::new_v4().to_string())
                .collect(),
        };

        let vectors: Vec<Vector> = doc_ids
            .iter()
            .zip(embeddings.iter())
            .zip(documents.iter())
            .map(|((id, values), doc)| {
                let mut metadata = doc.metadata.clone();
                metadata.insert(TEXT_KEY.to_string(), doc.page_content.clone().into());
                Vector {
                    id: id.clone(),
                    values: values.clone(),
                    sparse_values: None,
                    metadata: Some(Self::metadata_to_pinecone(&metadata)),
                }
            })
            .collect();

        let mut index = self
            .client
            .index(&self.index_host)
            .await
            .map_err(|e| Error::vector_store(format!("Failed to get Pinecone index: {e}")))?;

        index
            .upsert(&vectors, &self.namespace().into())
            .await
            .map_err(|e| Error::vector_store(format!("Pinecone upsert failed: {e}")))?;

        tracing::info!(count = vectors.len(), "upserted vectors");
        Ok(doc_ids)
    }

    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        let query_embedding = self.embeddings.embed_query(query).await?;

        let mut index = self
            .client
            .index(&self.index_host)
            .await
            .map_err(|e| Error::vector_store(format!("Failed to get Pinecone index: {e}")))?;

        // Signature: query_by_value(vector, sparse_vector, top_k, namespace,
        // filter, include_values, include_metadata)
        let response = index
            .query_by_value(
                query_embedding,
                None,
                k as u32,
                &self.namespace().into(),
                None,
                Some(false),
                Some(true),
            )
            .await
            .map_err(|e| Error::vector_store(format!("Pinecone query failed: {e}")))?;

        let documents: Vec<Document> = response
            .matches
            .iter()
            .map(|m| {
                let mut metadata = m
                    .metadata
                    .as_ref()
                    .map(Self::pinecone_to_metadata)
                    .unwrap_or_default();
                metadata.insert("score".to_string(), JsonValue::from(m.score));

                let page_content = metadata
                    .get(TEXT_KEY)
                    .and_then(|v| v.as_str())
                    .unwrap_or(&m.id)
                    .to_string();

                Document {
                    page_content,
                    metadata,
                    id: Some(m.id.clone()),
                }
            })
            .collect();

        Ok(documents)
    }

    async fn delete_all(&self) -> Result<()> {
        let mut index = self
            .client
            .index(&self.index_host)
            .await
            .map_err(|e| Error::vector_store(format!("Failed to get Pinecone index: {e}")))?;

        index
            .delete_all(&self.namespace().into())
            .await
            .map_err(|e| Error::vector_store(format!("Pinecone delete_all failed: {e}")))?;

        tracing::info!(namespace = self.namespace(), "deleted all vectors");
        Ok(())
    }
}


/// Live tests against a real Pinecone project. Run with:
/// `cargo test -p medichat-pinecone -- --ignored`
#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod live_tests {
    use super::*;
    use medichat_gemini::{GeminiEmbeddings, TaskType};

    fn live_embeddings() -> Arc<dyn Embeddings> {
        Arc::new(
            GeminiEmbeddings::new()
                .with_task_type(TaskType::RetrievalDocument)
                .with_dimensions(EMBEDDING_DIMENSION),
        )
    }

    #[tokio::test]
    #[ignore = "requires PINECONE_API_KEY and GEMINI_API_KEY"]
    async fn test_connect_bootstraps_index() {
        let store = PineconeVectorStore::connect("medichat-test", live_embeddings(), None)
            .await
            .unwrap();
        assert!(!store.index_host.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires PINECONE_API_KEY and GEMINI_API_KEY"]
    async fn test_add_and_search_round_trip() {
        let store = PineconeVectorStore::connect("medichat-test", live_embeddings(), None)
            .await
            .unwrap()
            .with_namespace("live-test");

        let docs = vec![
            Document::new("Hemoglobin carries oxygen in red blood cells.")
                .with_metadata("book", "A Laboratory Guide to Clinical Hematology"),
            Document::new("The heart pumps blood through the circulatory system.")
                .with_metadata("book", "Human Physiology"),
        ];
        let ids = store.add_documents(&docs, None).await.unwrap();
        assert_eq!(ids.len(), 2);

        let results = store
            .similarity_search("what protein transports oxygen?", 1)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].page_content.contains("Hemoglobin"));

        store.delete_all().await.unwrap();
    }
}
