//! The three-stage question-answering chain.
//!
//! `RagChain` composes reformulation, retrieval and answer generation into a
//! single `answer` call. Each stage is also public so callers and tests can
//! exercise them independently.

use std::collections::HashMap;
use std::sync::Arc;

use crate::chat_models::{ChatModel, Message};
use crate::documents::Document;
use crate::error::Result;
use crate::prompts::{
    format_documents, PromptTemplate, DOCUMENT_SEPARATOR, QA_SYSTEM_PROMPT,
    REFORMULATION_SYSTEM_PROMPT,
};
use crate::retrievers::Retriever;

/// Retrieval-augmented question answering over the indexed corpus.
pub struct RagChain {
    chat_model: Arc<dyn ChatModel>,
    retriever: Arc<dyn Retriever>,
    qa_prompt: PromptTemplate,
}

impl RagChain {
    /// Build a chain from a chat model and a retriever.
    pub fn new(chat_model: Arc<dyn ChatModel>, retriever: Arc<dyn Retriever>) -> Self {
        Self {
            chat_model,
            retriever,
            qa_prompt: PromptTemplate::from_template(QA_SYSTEM_PROMPT),
        }
    }

    /// Rewrite the user's question into a retrieval query.
    ///
    /// The model's output is used verbatim; an off-instruction reply degrades
    /// retrieval quality but is not detected here.
    pub async fn reformulate(&self, question: &str) -> Result<String> {
        let messages = [
            Message::system(REFORMULATION_SYSTEM_PROMPT),
            Message::human(question),
        ];
        let query = self.chat_model.generate(&messages).await?;
        tracing::debug!(%question, %query, "reformulated question");
        Ok(query)
    }

    /// Fetch the chunks most relevant to the (reformulated) query.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<Document>> {
        let documents = self.retriever.get_relevant_documents(query).await?;
        tracing::debug!(%query, count = documents.len(), "retrieved context chunks");
        Ok(documents)
    }

    /// Generate a grounded answer to `question` from the given context
    /// documents.
    pub async fn answer_with_context(
        &self,
        question: &str,
        documents: &[Document],
    ) -> Result<String> {
        let context = format_documents(documents, DOCUMENT_SEPARATOR);
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), context);
        let system = self.qa_prompt.format(&vars)?;

        let messages = [Message::system(system), Message::human(question)];
        self.chat_model.generate(&messages).await
    }

    /// Run the full chain: reformulate, retrieve, answer.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let query = self.reformulate(question).await?;
        let documents = self.retrieve(&query).await?;
        self.answer_with_context(question, &documents).await
    }
}
