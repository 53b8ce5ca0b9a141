//! OpenAI-compatible chat-completions client for the AI gateway.

pub mod chatbot;
pub mod planner;

use bon::Builder;
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prelude::*;

const COMPLETIONS_URL: &str =
    "https://gateway.ai.cloudflare.com/v1/vercel/ai-gateway/openai/chat/completions";

const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("AI gateway API key is not configured")]
    MissingApiKey,

    #[error("AI gateway error: {0}")]
    Upstream(StatusCode),

    #[error("request error: {0:#}")]
    Request(#[from] reqwest::Error),

    #[error("request error: {0:#}")]
    Middleware(#[from] reqwest_middleware::Error),

    #[error(transparent)]
    Anyhow(#[from] Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[must_use]
#[derive(Clone, Debug, Builder, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,

    #[builder(into)]
    pub content: String,
}

#[must_use]
#[derive(Builder, Serialize)]
pub struct CompletionRequest {
    #[builder(default = DEFAULT_MODEL)]
    pub model: &'static str,

    pub messages: Vec<ChatMessage>,

    pub max_tokens: u32,
}

#[must_use]
#[derive(Deserialize)]
pub struct Completion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl Completion {
    /// The first choice's content, if the gateway produced any.
    #[must_use]
    pub fn into_content(mut self) -> Option<String> {
        if self.choices.is_empty() {
            return None;
        }
        self.choices.swap_remove(0).message.content
    }
}

#[must_use]
#[derive(Clone)]
pub struct GatewayClient {
    client: ClientWithMiddleware,
    api_key: Option<SecretString>,
}

impl GatewayClient {
    pub const fn new(client: ClientWithMiddleware, api_key: Option<SecretString>) -> Self {
        Self { client, api_key }
    }

    /// Call the chat-completions endpoint.
    #[instrument(skip_all, fields(model = request.model, n_messages = request.messages.len()))]
    pub async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GatewayError> {
        let api_key = self.api_key.as_ref().ok_or(GatewayError::MissingApiKey)?;
        info!(model = request.model, "🤖 Requesting a completion…");
        let response = self
            .client
            .post(COMPLETIONS_URL)
            .bearer_auth(api_key.expose_secret())
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, %body, "‼️ The AI gateway returned an error");
            return Err(GatewayError::Upstream(status));
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_request_ok() -> Result {
        let request = CompletionRequest::builder()
            .messages(vec![ChatMessage::builder().role(Role::User).content("Namaste").build()])
            .max_tokens(1000)
            .build();
        assert_eq!(
            serde_json::to_string(&request)?,
            r#"{"model":"gpt-4o-mini","messages":[{"role":"user","content":"Namaste"}],"max_tokens":1000}"#,
        );
        Ok(())
    }

    #[test]
    fn deserialize_completion_ok() -> Result {
        let completion: Completion = serde_json::from_str(
            r#"{"id": "cmpl-1", "choices": [{"index": 0, "message": {"role": "assistant", "content": "Namaste!"}}]}"#,
        )?;
        assert_eq!(completion.into_content().as_deref(), Some("Namaste!"));
        Ok(())
    }

    #[test]
    fn empty_completion_has_no_content() -> Result {
        let completion: Completion = serde_json::from_str(r#"{"choices": []}"#)?;
        assert_eq!(completion.into_content(), None);
        Ok(())
    }
}
