//! Google Gemini chat completion client.
//!
//! Wraps the `generateContent` endpoint. System messages become the
//! `systemInstruction`, human messages become user-role contents.

use async_trait::async_trait;
use medichat::chat_models::{ChatModel, Message};
use medichat::config::{env_string, GEMINI_API_KEY};
use medichat::retry::{with_retry, RetryPolicy};
use medichat::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini chat model client.
///
/// # Example
///
/// ```rust,no_run
/// use medichat_gemini::ChatGemini;
///
/// let model = ChatGemini::new()
///     .with_api_key("your-api-key")
///     .with_temperature(0.2);
/// ```
pub struct ChatGemini {
    api_key: Option<String>,
    model: String,
    api_base: String,
    client: Client,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
    retry_policy: RetryPolicy,
}

impl ChatGemini {
    /// Create a client with default settings: `gemini-2.5-flash`, API key
    /// from the environment, no sampling overrides.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_key: env_string(GEMINI_API_KEY),
            model: DEFAULT_MODEL.to_string(),
            api_base: API_BASE.to_string(),
            client: Client::new(),
            temperature: None,
            max_output_tokens: None,
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

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap the response length in tokens.
    #[must_use]
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    /// Set the retry policy for API calls.
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

    fn build_request(&self, messages: &[Message]) -> GenerateContentRequest {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in messages {
            match message {
                Message::System(text) => system_parts.push(Part { text: text.clone() }),
                Message::Human(text) => contents.push(RoleContent {
                    role: "user".to_string(),
                    parts: vec![Part { text: text.clone() }],
                }),
            }
        }

        let generation_config = if self.temperature.is_some() || self.max_output_tokens.is_some() {
            Some(GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            })
        } else {
            None
        };

        GenerateContentRequest {
            contents,
            system_instruction: (!system_parts.is_empty())
                .then_some(SystemInstruction { parts: system_parts }),
            generation_config,
        }
    }
}

impl Default for ChatGemini {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatModel for ChatGemini {
    async fn generate(&self, messages: &[Message]) -> Result<String> {
        let api_key = self.get_api_key()?;
        // The key travels in a header so it never appears in error output.
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let request = self.build_request(messages);
        debug!(model = %self.model, messages = messages.len(), "requesting completion");

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

        let generate_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::api(format!("Failed to parse Gemini response: {e}")))?;

        let candidate = generate_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::api("Gemini returned no candidates"))?;

        let text = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        debug!(answer_len = text.len(), "received completion");
        Ok(text)
    }
}

// Request/response types for the Gemini API.

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RoleContent>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "systemInstruction")]
    system_instruction: Option<SystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "generationConfig")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RoleContent {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "maxOutputTokens")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_default_constructor() {
        let model = ChatGemini::new();
        assert_eq!(model.model, "gemini-2.5-flash");
        assert!(model.temperature.is_none());
    }

    #[test]
    fn test_builder_chaining() {
        let model = ChatGemini::new()
            .with_api_key("key")
            .with_model("gemini-2.0-flash")
            .with_temperature(0.2)
            .with_max_output_tokens(512);
        assert_eq!(model.api_key, Some("key".to_string()));
        assert_eq!(model.model, "gemini-2.0-flash");
        assert_eq!(model.temperature, Some(0.2));
        assert_eq!(model.max_output_tokens, Some(512));
    }

    #[test]
    fn test_build_request_splits_roles() {
        let model = ChatGemini::new().with_temperature(0.2);
        let request = model.build_request(&[
            Message::system("be concise"),
            Message::human("what is anemia?"),
        ]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be concise");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "what is anemia?");
        assert!((json["generationConfig"]["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_build_request_omits_empty_sections() {
        let model = ChatGemini::new();
        let request = model.build_request(&[Message::human("hello")]);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_none());
        assert!(json.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn test_generate_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "what is anemia?" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {
                        "parts": [{ "text": "Anemia is a shortage of red blood cells." }],
                        "role": "model"
                    }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let model = ChatGemini::new()
            .with_api_key("test-key")
            .with_api_base(server.uri());

        let answer = model
            .generate(&[Message::system("be concise"), Message::human("what is anemia?")])
            .await
            .unwrap();
        assert_eq!(answer, "Anemia is a shortage of red blood cells.");
    }

    #[tokio::test]
    async fn test_generate_no_candidates_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let model = ChatGemini::new()
            .with_api_key("test-key")
            .with_api_base(server.uri());

        let err = model.generate(&[Message::human("hi")]).await.unwrap_err();
        assert!(err.to_string().contains("no candidates"));
    }

    #[tokio::test]
    async fn test_error_message_never_contains_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let model = ChatGemini::new()
            .with_api_key("very-secret-key")
            .with_api_base(server.uri())
            .with_retry_policy(RetryPolicy::no_retry());

        let err = model.generate(&[Message::human("hi")]).await.unwrap_err();
        assert!(!err.to_string().contains("very-secret-key"));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let model = ChatGemini {
            api_key: None,
            ..ChatGemini::new()
        };
        let err = model.generate(&[Message::human("hi")]).await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
