//! Prompt templates and the fixed system prompts.

use std::collections::HashMap;

use crate::documents::Document;
use crate::error::{Error, Result};

/// Separator placed between retrieved chunk texts in the answer prompt.
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

/// System prompt for the query reformulation step.
///
/// Classifies the question into the corpus's two subject areas, expands
/// abbreviations and adds standard terminology. The model is told to return
/// only the rewritten query; the output is passed downstream as-is.
pub const REFORMULATION_SYSTEM_PROMPT: &str = "\
You rewrite user questions into search queries for a medical textbook index.

First classify the question's subject area:
- Hematology, if it concerns blood, hemoglobin, red or white blood cells, \
platelets, anemia, leukemia, clotting, or bone marrow.
- Physiology, if it concerns organs, organ systems, homeostasis, muscles, \
nerves, circulation, respiration, or digestion.
- Both, if it spans the two areas.

Then rewrite the question as a retrieval query: expand abbreviations \
(Hb becomes hemoglobin, RBC becomes red blood cell, WBC becomes white blood \
cell, BP becomes blood pressure) and add standard terminology from the \
detected subject area.

Return only the rewritten query. Do not answer the question.";

/// System prompt template for answer generation. `{context}` is filled with
/// the retrieved chunk texts.
pub const QA_SYSTEM_PROMPT: &str = "\
You are a medical assistant for question-answering tasks. Use the following \
pieces of retrieved context to answer the question. If the context does not \
contain the answer, say that you don't know. Use three sentences maximum and \
keep the answer concise.

{context}";

/// A prompt template with `{variable}` placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    input_variables: Vec<String>,
}

impl PromptTemplate {
    /// Build a template, inferring the input variables from `{name}`
    /// placeholders.
    #[must_use]
    pub fn from_template(template: impl Into<String>) -> Self {
        let template = template.into();
        let input_variables = extract_variables(&template);
        Self { template, input_variables }
    }

    /// The variables this template requires.
    #[must_use]
    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    /// Substitute variables into the template.
    ///
    /// Errors if a required variable is missing.
    pub fn format(&self, variables: &HashMap<String, String>) -> Result<String> {
        let missing: Vec<&str> = self
            .input_variables
            .iter()
            .filter(|v| !variables.contains_key(*v))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(Error::invalid_input(format!(
                "missing prompt variables: {}",
                missing.join(", ")
            )));
        }

        let mut result = String::with_capacity(self.template.len());
        let mut remaining = self.template.as_str();
        while let Some(start) = remaining.find('{') {
            result.push_str(&remaining[..start]);
            remaining = &remaining[start..];
            match remaining.find('}') {
                Some(end) => {
                    let name = &remaining[1..end];
                    match variables.get(name) {
                        Some(value) => result.push_str(value),
                        // unknown placeholder stays literal
                        None => result.push_str(&remaining[..=end]),
                    }
                    remaining = &remaining[end + 1..];
                }
                None => {
                    result.push('{');
                    remaining = &remaining[1..];
                }
            }
        }
        result.push_str(remaining);
        Ok(result)
    }
}

/// Find all `{variable}` names in a template, in order, deduplicated.
fn extract_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut remaining = template;
    while let Some(start) = remaining.find('{') {
        remaining = &remaining[start..];
        match remaining.find('}') {
            Some(end) => {
                let name = &remaining[1..end];
                if !name.is_empty()
                    && !name.contains('{')
                    && !variables.iter().any(|v| v == name)
                {
                    variables.push(name.to_string());
                }
                remaining = &remaining[end + 1..];
            }
            None => break,
        }
    }
    variables
}

/// Join the documents' texts with `separator` for insertion into a prompt.
#[must_use]
pub fn format_documents(documents: &[Document], separator: &str) -> String {
    documents
        .iter()
        .map(|doc| doc.page_content.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}
