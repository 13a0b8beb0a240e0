//! HTTP routes: the chat page and the chat endpoint.

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use tracing::{error, info, instrument};

use crate::state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(chat_page))
        .route("/get", post(chat))
        .with_state(state)
}

/// Serve the static chat page.
async fn chat_page() -> Html<&'static str> {
    Html(include_str!("../templates/chat.html"))
}

/// Form body for the chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    /// The user's message.
    pub msg: String,
}

/// Run the chain for one question and return the answer as plain text.
///
/// Any pipeline failure maps to a 500 with a fixed plain-text body; the
/// failure detail goes to the log only, since upstream errors can carry
/// request internals that do not belong in a client response.
#[instrument(skip(state, form), fields(msg_len = form.msg.len()))]
async fn chat(State(state): State<AppState>, Form(form): Form<ChatForm>) -> Response {
    info!(msg = %form.msg, "received chat message");

    match state.chain.answer(&form.msg).await {
        Ok(answer) => {
            info!(answer_len = answer.len(), "chat answered");
            answer.into_response()
        }
        Err(err) => {
            error!(error = %err, "chat request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "request failed").into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use medichat::chat_models::{ChatModel, Message};
    use medichat::documents::Document;
    use medichat::retrievers::Retriever;
    use medichat::{Error, RagChain, Result};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct EchoChat;

    #[async_trait]
    impl ChatModel for EchoChat {
        async fn generate(&self, messages: &[Message]) -> Result<String> {
            let human = messages
                .iter()
                .rev()
                .find(|m| matches!(m, Message::Human(_)))
                .map(Message::content)
                .unwrap_or_default();
            Ok(format!("echo: {human}"))
        }
    }

    struct FailingChat;

    #[async_trait]
    impl ChatModel for FailingChat {
        async fn generate(&self, _messages: &[Message]) -> Result<String> {
            Err(Error::api("model unavailable"))
        }
    }

    struct EmptyRetriever;

    #[async_trait]
    impl Retriever for EmptyRetriever {
        async fn get_relevant_documents(&self, _query: &str) -> Result<Vec<Document>> {
            Ok(Vec::new())
        }
    }

    fn test_app(chat_model: Arc<dyn ChatModel>) -> Router {
        let chain = RagChain::new(chat_model, Arc::new(EmptyRetriever));
        router(AppState::new(chain))
    }

    fn chat_request(msg: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/get")
            .header(
                header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(Body::from(format!(
                "msg={}",
                url_encode(msg)
            )))
            .unwrap()
    }

    fn url_encode(s: &str) -> String {
        s.replace(' ', "+").replace('?', "%3F")
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_chat_page_returns_html() {
        let app = test_app(Arc::new(EchoChat));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("<form"));
    }

    #[tokio::test]
    async fn test_chat_returns_answer_as_plain_text() {
        let app = test_app(Arc::new(EchoChat));
        let response = app.oneshot(chat_request("what is anemia?")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert_eq!(body, "echo: what is anemia?");
    }

    #[tokio::test]
    async fn test_empty_message_is_accepted() {
        let app = test_app(Arc::new(EchoChat));
        let response = app.oneshot(chat_request("")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert_eq!(body, "echo: ");
    }

    #[tokio::test]
    async fn test_chain_failure_maps_to_500() {
        let app = test_app(Arc::new(FailingChat));
        let response = app.oneshot(chat_request("question")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert_eq!(body, "request failed");
    }

    #[tokio::test]
    async fn test_error_detail_stays_out_of_response_body() {
        let app = test_app(Arc::new(FailingChat));
        let response = app.oneshot(chat_request("question")).await.unwrap();
        let body = body_string(response).await;
        assert!(!body.contains("model unavailable"));
    }

    #[tokio::test]
    async fn test_missing_msg_field_is_client_error() {
        let app = test_app(Arc::new(EchoChat));
        let request = Request::builder()
            .method("POST")
            .uri("/get")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("other=1"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }
}
